//! Go: net/http handlers, gin/echo routes, gRPC registration and clients,
//! outbound http calls.

use std::sync::LazyLock;

use super::rules::{apply_rules, InterfaceRule};
use super::{InterfaceContext, InterfaceDetector};
use crate::graph::types::{InterfaceDescriptor, InterfaceRole::*, InterfaceType::*};
use crate::scanner::language_detect::Language;

const ROUTER_METHOD: &str = r#"\b\w+\.(?P<method>GET|POST|PUT|DELETE|PATCH|Any)\(\s*"(?P<path>[^"]+)""#;

static RULES: LazyLock<Vec<InterfaceRule>> = LazyLock::new(|| {
    vec![
        InterfaceRule::new(
            r#"\b(?:http|mux|r|router|m)\.Handle(?:Func)?\(\s*"(?P<path>[^"]+)""#,
            Rest,
            Provider,
            "net/http",
        ),
        InterfaceRule::new(ROUTER_METHOD, Rest, Provider, "gin").requires("gin-gonic"),
        InterfaceRule::new(ROUTER_METHOD, Rest, Provider, "echo").requires("labstack/echo"),
        InterfaceRule::new(r#"\bRegister(?P<name>\w+)Server\("#, Grpc, Provider, "grpc-go"),
        InterfaceRule::new(r#"\bNew(?P<name>\w+)Client\(\s*\w*[cC]onn"#, Grpc, Consumer, "grpc-go")
            .requires("grpc"),
        InterfaceRule::new(
            r#"\bhttp\.(?P<method>Get|Post|Head|PostForm)\(\s*"(?P<path>[^"]+)""#,
            Rest,
            Consumer,
            "net/http",
        ),
        InterfaceRule::new(
            r#"\bhttp\.NewRequest(?:WithContext)?\([^"]*"(?P<method>[A-Z]+)"\s*,\s*"(?P<path>[^"]+)""#,
            Rest,
            Consumer,
            "net/http",
        ),
    ]
});

pub struct GoDetector;

impl InterfaceDetector for GoDetector {
    fn name(&self) -> &'static str {
        "go"
    }

    fn languages(&self) -> &'static [Language] {
        &[Language::Go]
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
        GoDetector.detect(&InterfaceContext::new("main.go", Language::Go, content))
    }

    #[test]
    fn net_http_handlers_with_method_patterns() {
        let found = detect("http.HandleFunc(\"/health\", health)\nmux.HandleFunc(\"GET /users/{id}\", user)\n");
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].path.as_deref(), Some("/users/{id}"));
        assert_eq!(found[1].properties.get("method").map(String::as_str), Some("GET"));
    }

    #[test]
    fn echo_routes_need_echo_import() {
        let content = "import \"github.com/labstack/echo/v4\"\ne.POST(\"/orders\", create)\n";
        let found = detect(content);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].framework, "echo");
    }

    #[test]
    fn grpc_server_and_http_client() {
        let content = "pb.RegisterGreeterServer(s, &server{})\nresp, err := http.Get(\"http://users/api/users\")\n";
        let found = detect(content);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].interface_type, InterfaceType::Grpc);
        assert_eq!(found[0].name.as_deref(), Some("Greeter"));
        assert_eq!(found[1].role, InterfaceRole::Consumer);
    }
}
