//! Java: Spring mappings, RestTemplate/WebClient, gRPC, Kafka, websocket endpoints.

use std::sync::LazyLock;

use super::rules::{apply_rules, InterfaceRule};
use super::{InterfaceContext, InterfaceDetector};
use crate::graph::types::{InterfaceDescriptor, InterfaceRole::*, InterfaceType::*};
use crate::scanner::language_detect::Language;

static RULES: LazyLock<Vec<InterfaceRule>> = LazyLock::new(|| {
    vec![
        InterfaceRule::new(
            r#"@(?P<method>Get|Post|Put|Delete|Patch|Request)Mapping\(\s*(?:(?:value|path)\s*=\s*)?\{?\s*"(?P<path>[^"]*)""#,
            Rest,
            Provider,
            "spring",
        ),
        InterfaceRule::new(
            r#"\b\w*[rR]estTemplate\.(?P<method>getForObject|getForEntity|postForObject|postForEntity|patchForObject|exchange|put|delete)\(\s*"(?P<path>[^"]+)""#,
            Rest,
            Consumer,
            "resttemplate",
        ),
        InterfaceRule::new(r#"\.uri\(\s*"(?P<path>[^"]+)""#, Rest, Consumer, "webclient").requires("WebClient"),
        InterfaceRule::new(r#"extends\s+(?:\w+\.)*(?P<name>\w+)ImplBase\b"#, Grpc, Provider, "grpc-java"),
        InterfaceRule::new(
            r#"\b(?P<name>\w+)Grpc\.new(?:Blocking|Future)?Stub\("#,
            Grpc,
            Consumer,
            "grpc-java",
        ),
        InterfaceRule::new(
            r#"@KafkaListener\([^)]*topics\s*=\s*\{?\s*"(?P<name>[^"]+)""#,
            MessageQueue,
            Consumer,
            "spring-kafka",
        ),
        InterfaceRule::new(
            r#"\b\w*[kK]afkaTemplate\.send\(\s*"(?P<name>[^"]+)""#,
            MessageQueue,
            Provider,
            "spring-kafka",
        ),
        InterfaceRule::new(r#"@ServerEndpoint\(\s*"(?P<path>[^"]+)""#, Websocket, Provider, "jakarta-websocket"),
    ]
});

pub struct JavaDetector;

impl InterfaceDetector for JavaDetector {
    fn name(&self) -> &'static str {
        "java"
    }

    fn languages(&self) -> &'static [Language] {
        &[Language::Java]
    }

    fn detect(&self, ctx: &InterfaceContext<'_>) -> Vec<InterfaceDescriptor> {
        apply_rules(&RULES, ctx)
    }
}
