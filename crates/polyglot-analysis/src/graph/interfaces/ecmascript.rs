//! TypeScript/JavaScript: Express/Fastify routes, fetch/axios consumers,
//! GraphQL servers and clients, WebSocket, gRPC.

use std::sync::LazyLock;

use super::rules::{apply_rules, InterfaceRule};
use super::{InterfaceContext, InterfaceDetector};
use crate::graph::types::{InterfaceDescriptor, InterfaceRole::*, InterfaceType::*};
use crate::scanner::language_detect::Language;

static RULES: LazyLock<Vec<InterfaceRule>> = LazyLock::new(|| {
    vec![
        InterfaceRule::new(
            r#"\b(?:app|router|server|api|route|routes)\.(?P<method>get|post|put|delete|patch|all)\(\s*['"`](?P<path>/[^'"`]*)['"`]"#,
            Rest,
            Provider,
            "express",
        ),
        InterfaceRule::new(
            r#"\bfastify\.(?P<method>get|post|put|delete|patch)\(\s*['"`](?P<path>/[^'"`]*)['"`]"#,
            Rest,
            Provider,
            "fastify",
        ),
        InterfaceRule::new(r#"\bfetch\(\s*['"`](?P<path>[^'"`]+)['"`]"#, Rest, Consumer, "fetch"),
        InterfaceRule::new(
            r#"\baxios(?:\.(?P<method>get|post|put|delete|patch))?\(\s*['"`](?P<path>[^'"`]+)['"`]"#,
            Rest,
            Consumer,
            "axios",
        ),
        InterfaceRule::new(r#"\bnew\s+(?:ApolloServer|GraphQLServer|GraphQLSchema)\b"#, Graphql, Provider, "apollo"),
        InterfaceRule::new(
            r#"\b(?:buildSchema|createSchema|makeExecutableSchema)\("#,
            Graphql,
            Provider,
            "graphql-tools",
        ),
        InterfaceRule::new(
            r#"\b(?:useQuery|useMutation|useSubscription)\(\s*(?P<name>\w+)"#,
            Graphql,
            Consumer,
            "apollo-client",
        ),
        InterfaceRule::new(r#"\bnew\s+WebSocket\(\s*['"`](?P<path>[^'"`]+)['"`]"#, Websocket, Consumer, "websocket"),
        InterfaceRule::new(r#"\bnew\s+(?:WebSocketServer|WebSocket\.Server)\("#, Websocket, Provider, "ws"),
        InterfaceRule::new(r#"\bio\.on\(\s*['"]connection['"]"#, Websocket, Provider, "socket.io"),
        InterfaceRule::new(r#"\.addService\(\s*(?P<name>[\w.]+)"#, Grpc, Provider, "grpc-js").requires("grpc"),
        InterfaceRule::new(
            r#"\bnew\s+(?:\w+\.)*(?P<name>\w+)\([^)]*grpc\.credentials"#,
            Grpc,
            Consumer,
            "grpc-js",
        ),
    ]
});

pub struct EcmaScriptDetector;

impl InterfaceDetector for EcmaScriptDetector {
    fn name(&self) -> &'static str {
        "ecmascript"
    }

    fn languages(&self) -> &'static [Language] {
        &[Language::TypeScript, Language::JavaScript]
    }

    fn detect(&self, ctx: &InterfaceContext<'_>) -> Vec<InterfaceDescriptor> {
        apply_rules(&RULES, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::{InterfaceRole, InterfaceType};

    fn detect(content: &str) -> Vec<InterfaceDescriptor> {
        EcmaScriptDetector.detect(&InterfaceContext::new("app.ts", Language::TypeScript, content))
    }

    #[test]
    fn express_routes() {
        let found = detect("const app = express();\napp.get('/users/:id', handler);\nrouter.post(\"/orders\", create);\n");
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|d| d.framework == "express" && d.role == InterfaceRole::Provider));
        assert_eq!(found[0].path.as_deref(), Some("/users/:id"));
        assert_eq!(found[1].properties.get("method").map(String::as_str), Some("POST"));
    }

    #[test]
    fn fetch_and_axios_consumers() {
        let found = detect("await fetch(`/api/users`);\nconst r = await axios.post('/api/orders', body);\n");
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|d| d.role == InterfaceRole::Consumer));
        assert_eq!(found[1].framework, "axios");
    }

    #[test]
    fn graphql_and_websocket() {
        let found = detect("const server = new ApolloServer({ typeDefs });\nconst ws = new WebSocket('ws://host/feed');\n");
        let types: Vec<InterfaceType> = found.iter().map(|d| d.interface_type).collect();
        assert_eq!(types, vec![InterfaceType::Graphql, InterfaceType::Websocket]);
    }
}
