//! Built-in nodes that can be declared from YAML

use crate::core::StepKind;
use crate::node::{Node, Payload};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Placeholder syntax used by the template node: `{{ field }}` or `{{ a.b }}`
const PLACEHOLDER_PATTERN: &str = r"\{\{\s*([A-Za-z0-9_\-]+(?:\.[A-Za-z0-9_\-]+)*)\s*\}\}";

/// Node configuration as defined in YAML (`type` selects the node)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeConfig {
    /// Emit a fixed value
    Value { value: Payload },

    /// Render a string template from the fields of the input object
    Template {
        template: String,
        #[serde(default = "default_template_field")]
        field: String,
    },

    /// Forward the input unchanged
    Passthrough,

    /// Always fail with the given message
    Fail { message: String },

    /// Print the input as a JSON line
    Stdout,

    /// Drop the input
    Discard,
}

fn default_template_field() -> String {
    "message".to_string()
}

/// Description of a built-in node type, for listings
#[derive(Debug, Clone, Serialize)]
pub struct NodeTypeInfo {
    pub name: &'static str,
    pub kind: StepKind,
    pub description: &'static str,
}

impl NodeConfig {
    /// Step kind this node occupies in a pipeline
    pub fn kind(&self) -> StepKind {
        match self {
            NodeConfig::Value { .. } => StepKind::Source,
            NodeConfig::Template { .. } | NodeConfig::Fail { .. } => StepKind::Processor,
            NodeConfig::Passthrough => StepKind::Bidirectional,
            NodeConfig::Stdout | NodeConfig::Discard => StepKind::Sink,
        }
    }

    /// The `type` tag of this config
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeConfig::Value { .. } => "value",
            NodeConfig::Template { .. } => "template",
            NodeConfig::Passthrough => "passthrough",
            NodeConfig::Fail { .. } => "fail",
            NodeConfig::Stdout => "stdout",
            NodeConfig::Discard => "discard",
        }
    }

    /// Instantiate the node
    pub fn to_node(&self) -> Result<Arc<dyn Node>> {
        let node: Arc<dyn Node> = match self {
            NodeConfig::Value { value } => Arc::new(ValueNode::new(value.clone())),
            NodeConfig::Template { template, field } => {
                Arc::new(TemplateNode::new(template.clone(), field.clone())?)
            }
            NodeConfig::Passthrough => Arc::new(PassthroughNode),
            NodeConfig::Fail { message } => Arc::new(FailNode::new(message.clone())),
            NodeConfig::Stdout => Arc::new(StdoutNode),
            NodeConfig::Discard => Arc::new(DiscardNode),
        };
        Ok(node)
    }

    /// All built-in node types
    pub fn catalog() -> Vec<NodeTypeInfo> {
        vec![
            NodeTypeInfo {
                name: "value",
                kind: StepKind::Source,
                description: "Emit the configured `value`",
            },
            NodeTypeInfo {
                name: "template",
                kind: StepKind::Processor,
                description: "Render `template` from input fields into `{ <field>: ... }`",
            },
            NodeTypeInfo {
                name: "passthrough",
                kind: StepKind::Bidirectional,
                description: "Forward the input unchanged",
            },
            NodeTypeInfo {
                name: "fail",
                kind: StepKind::Processor,
                description: "Fail with the configured `message`",
            },
            NodeTypeInfo {
                name: "stdout",
                kind: StepKind::Sink,
                description: "Print the input as a JSON line",
            },
            NodeTypeInfo {
                name: "discard",
                kind: StepKind::Sink,
                description: "Drop the input",
            },
        ]
    }
}

/// Source emitting a fixed value
#[derive(Debug, Clone)]
pub struct ValueNode {
    value: Payload,
}

impl ValueNode {
    pub fn new(value: Payload) -> Self {
        Self { value }
    }
}

#[async_trait]
impl Node for ValueNode {
    async fn process(&self, _input: Option<Payload>) -> Result<Payload> {
        Ok(self.value.clone())
    }
}

/// Processor rendering a template against the input object
#[derive(Debug, Clone)]
pub struct TemplateNode {
    template: String,
    field: String,
    placeholder: Regex,
}

impl TemplateNode {
    pub fn new(template: String, field: String) -> Result<Self> {
        let placeholder =
            Regex::new(PLACEHOLDER_PATTERN).context("Failed to compile template placeholder")?;
        Ok(Self {
            template,
            field,
            placeholder,
        })
    }

    /// Replace every placeholder with the matching input field
    pub fn render(&self, input: Option<&Payload>) -> Result<String> {
        let mut rendered = String::with_capacity(self.template.len());
        let mut last = 0;

        for caps in self.placeholder.captures_iter(&self.template) {
            let (Some(whole), Some(path)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = match input.and_then(|v| lookup(v, path.as_str())) {
                Some(value) => value,
                None => bail!("Template references missing field '{}'", path.as_str()),
            };

            rendered.push_str(&self.template[last..whole.start()]);
            match value {
                Payload::String(s) => rendered.push_str(s),
                other => rendered.push_str(&other.to_string()),
            }
            last = whole.end();
        }

        rendered.push_str(&self.template[last..]);
        Ok(rendered)
    }
}

fn lookup<'a>(value: &'a Payload, path: &str) -> Option<&'a Payload> {
    path.split('.').try_fold(value, |current, key| current.get(key))
}

#[async_trait]
impl Node for TemplateNode {
    async fn process(&self, input: Option<Payload>) -> Result<Payload> {
        let rendered = self.render(input.as_ref())?;
        debug!("Rendered template into '{}': {}", self.field, rendered);

        let mut output = serde_json::Map::new();
        output.insert(self.field.clone(), Payload::String(rendered));
        Ok(Payload::Object(output))
    }
}

/// Bidirectional node forwarding its input
#[derive(Debug, Clone, Copy)]
pub struct PassthroughNode;

#[async_trait]
impl Node for PassthroughNode {
    async fn process(&self, input: Option<Payload>) -> Result<Payload> {
        Ok(input.unwrap_or(Payload::Null))
    }
}

/// Processor that always fails
#[derive(Debug, Clone)]
pub struct FailNode {
    message: String,
}

impl FailNode {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

#[async_trait]
impl Node for FailNode {
    async fn process(&self, _input: Option<Payload>) -> Result<Payload> {
        bail!("{}", self.message)
    }
}

/// Sink printing its input to stdout
#[derive(Debug, Clone, Copy)]
pub struct StdoutNode;

#[async_trait]
impl Node for StdoutNode {
    async fn process(&self, input: Option<Payload>) -> Result<Payload> {
        let value = input.unwrap_or(Payload::Null);
        println!("{}", serde_json::to_string(&value)?);
        Ok(Payload::Null)
    }
}

/// Sink dropping its input
#[derive(Debug, Clone, Copy)]
pub struct DiscardNode;

#[async_trait]
impl Node for DiscardNode {
    async fn process(&self, _input: Option<Payload>) -> Result<Payload> {
        Ok(Payload::Null)
    }
}
