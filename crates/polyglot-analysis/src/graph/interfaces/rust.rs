//! Rust: actix-web and axum routes, tonic services and clients, reqwest.

use std::sync::LazyLock;

use super::rules::{apply_rules, InterfaceRule};
use super::{InterfaceContext, InterfaceDetector};
use crate::graph::types::{InterfaceDescriptor, InterfaceRole::*, InterfaceType::*};
use crate::scanner::language_detect::Language;

static RULES: LazyLock<Vec<InterfaceRule>> = LazyLock::new(|| {
    vec![
        InterfaceRule::new(
            r#"#\[(?P<method>get|post|put|delete|patch)\(\s*"(?P<path>[^"]+)""#,
            Rest,
            Provider,
            "actix-web",
        )
        .requires("actix"),
        InterfaceRule::new(r#"web::resource\(\s*"(?P<path>[^"]+)""#, Rest, Provider, "actix-web"),
        InterfaceRule::new(
            r#"\.route\(\s*"(?P<path>[^"]+)"(?:\s*,\s*(?:\w+::)*(?P<method>get|post|put|delete|patch)\b)?"#,
            Rest,
            Provider,
            "axum",
        )
        .requires("axum"),
        InterfaceRule::new(r#"\b(?P<name>\w+)Server::new\("#, Grpc, Provider, "tonic").requires("tonic"),
        InterfaceRule::new(r#"\b(?P<name>\w+)Client::(?:connect|new)\("#, Grpc, Consumer, "tonic")
            .requires("tonic"),
        InterfaceRule::new(
            r#"\b(?:reqwest|client|http)(?:::|\.)(?P<method>get|post|put|delete|patch)\(\s*(?:&?format!\(\s*)?"(?P<path>[^"]+)""#,
            Rest,
            Consumer,
            "reqwest",
        )
        .requires("reqwest"),
        InterfaceRule::new(r#"connect_async\(\s*"(?P<path>[^"]+)""#, Websocket, Consumer, "tungstenite"),
    ]
});

pub struct RustDetector;

impl InterfaceDetector for RustDetector {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn languages(&self) -> &'static [Language] {
        &[Language::Rust]
    }

    fn detect(&self, ctx: &InterfaceContext<'_>) -> Vec<InterfaceDescriptor> {
        apply_rules(&RULES, ctx)
    }
}
