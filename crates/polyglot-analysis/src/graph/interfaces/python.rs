//! Python: Flask/FastAPI/Django routes, requests/httpx clients, gRPC
//! servicers and stubs, Celery tasks, Kafka, Graphene/Strawberry schemas.

use std::sync::LazyLock;

use super::rules::{apply_rules, InterfaceRule};
use super::{InterfaceContext, InterfaceDetector};
use crate::graph::types::{InterfaceDescriptor, InterfaceRole::*, InterfaceType::*};
use crate::scanner::language_detect::Language;

static RULES: LazyLock<Vec<InterfaceRule>> = LazyLock::new(|| {
    vec![
        InterfaceRule::new(
            r#"@\w+\.route\(\s*['"](?P<path>[^'"]+)['"](?:[^)]*methods\s*=\s*[\[(](?P<methods>[^\])]*)[\])])?"#,
            Rest,
            Provider,
            "flask",
        ),
        InterfaceRule::new(
            r#"@\w+\.(?P<method>get|post|put|delete|patch)\(\s*['"](?P<path>[^'"]+)['"]"#,
            Rest,
            Provider,
            "fastapi",
        ),
        InterfaceRule::new(r#"@\w+\.websocket\(\s*['"](?P<path>[^'"]+)['"]"#, Websocket, Provider, "fastapi"),
        InterfaceRule::new(r#"\b(?:re_)?path\(\s*r?['"]\^?(?P<path>[^'"$]+)"#, Rest, Provider, "django")
            .requires("urlpatterns"),
        InterfaceRule::new(
            r#"\b(?:requests|httpx|session|client)\.(?P<method>get|post|put|delete|patch)\(\s*f?['"](?P<path>[^'"]+)['"]"#,
            Rest,
            Consumer,
            "requests",
        ),
        InterfaceRule::new(r#"class\s+(?P<name>\w+)\(\s*[\w.]*Servicer\s*\)"#, Grpc, Provider, "grpcio"),
        InterfaceRule::new(r#"\b(?P<name>\w+)Stub\(\s*\w+"#, Grpc, Consumer, "grpcio").requires("grpc"),
        InterfaceRule::new(r#"@(?:\w+\.)?(?:task|shared_task)\b"#, MessageQueue, Provider, "celery")
            .requires("celery"),
        InterfaceRule::new(r#"KafkaConsumer\(\s*['"](?P<name>[^'"]+)['"]"#, MessageQueue, Consumer, "kafka"),
        InterfaceRule::new(r#"\.send\(\s*['"](?P<name>[^'"]+)['"]"#, MessageQueue, Provider, "kafka")
            .requires("KafkaProducer"),
        InterfaceRule::new(r#"class\s+(?P<name>\w+)\(\s*graphene\.ObjectType\s*\)"#, Graphql, Provider, "graphene"),
        InterfaceRule::new(r#"@strawberry\.type\b"#, Graphql, Provider, "strawberry"),
    ]
});

pub struct PythonDetector;

impl InterfaceDetector for PythonDetector {
    fn name(&self) -> &'static str {
        "python"
    }

    fn languages(&self) -> &'static [Language] {
        &[Language::Python]
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
        PythonDetector.detect(&InterfaceContext::new("svc.py", Language::Python, content))
    }

    #[test]
    fn flask_route_with_methods() {
        let found = detect("@app.route('/users/<id>', methods=['GET', 'POST'])\ndef user(id):\n    pass\n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].framework, "flask");
        assert_eq!(found[0].path.as_deref(), Some("/users/<id>"));
        assert_eq!(found[0].properties.get("method").map(String::as_str), Some("GET,POST"));
        assert_eq!(found[0].properties.get("line").map(String::as_str), Some("1"));
    }

    #[test]
    fn fastapi_route_and_requests_client() {
        let found = detect("@router.post(\"/orders\")\nasync def create():\n    requests.get(\"http://billing/invoices\")\n");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].role, InterfaceRole::Provider);
        assert_eq!(found[0].properties.get("method").map(String::as_str), Some("POST"));
        assert_eq!(found[1].role, InterfaceRole::Consumer);
        assert_eq!(found[1].path.as_deref(), Some("http://billing/invoices"));
    }

    #[test]
    fn grpc_servicer_and_celery() {
        let content = "from celery import shared_task\nclass Greeter(greeter_pb2_grpc.GreeterServicer):\n    pass\n@shared_task\ndef work():\n    pass\n";
        let found = detect(content);
        let types: Vec<InterfaceType> = found.iter().map(|d| d.interface_type).collect();
        assert_eq!(types, vec![InterfaceType::Grpc, InterfaceType::MessageQueue]);
        assert_eq!(found[0].name.as_deref(), Some("Greeter"));
    }

    #[test]
    fn django_paths_need_urlpatterns() {
        assert!(detect("path('users/', views.users)\n").is_empty());
        let found = detect("urlpatterns = [\n    path('users/', views.users),\n]\n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].framework, "django");
    }
}
