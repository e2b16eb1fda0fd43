//! Tera-based template engine.
//!
//! Templates see the three contract parameters as top-level variables, the
//! parsed definition root as `definition` and the raw XML as
//! `definition_xml`. Undefined variables are errors, so a template that
//! references a node the definition lacks fails instead of emitting a hole.
//!
//! Tree-query filters:
//! - `elements(name="Activity")`: direct child elements, optionally by name
//! - `descendants(name="Checkpoint")`: every element below, in document order
//! - `attr(name="ID", default="")`: attribute value, with optional fallback
//! - `pascal_case`, `snake_case`: identifier helpers

use std::collections::HashMap;

use serde_json::Value;
use tera::{Context, Tera};

use crate::core::utils::{to_pascal_case, to_snake_case};
use crate::generation::errors::error_chain;
use crate::generation::{
    CompiledTemplate, DefinitionDocument, GenerationError, TemplateEngine, TemplateParameters,
};

const TEMPLATE_NAME: &str = "bam_api";

/// Tera template engine
#[derive(Debug, Default, Clone, Copy)]
pub struct TeraEngine;

impl TeraEngine {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateEngine for TeraEngine {
    type Program = TeraProgram;

    fn compile(&self, template_text: &str) -> Result<Self::Program, GenerationError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.register_filter("elements", elements_filter);
        tera.register_filter("descendants", descendants_filter);
        tera.register_filter("attr", attr_filter);
        tera.register_filter("pascal_case", pascal_case_filter);
        tera.register_filter("snake_case", snake_case_filter);

        tera.add_raw_template(TEMPLATE_NAME, template_text)
            .map_err(|e| GenerationError::TemplateCompileError(error_chain(&e)))?;

        Ok(TeraProgram { tera })
    }
}

/// A compiled Tera template
#[derive(Debug)]
pub struct TeraProgram {
    tera: Tera,
}

impl CompiledTemplate for TeraProgram {
    fn render(
        &self,
        document: &DefinitionDocument,
        parameters: &TemplateParameters,
    ) -> Result<String, GenerationError> {
        let mut context = Context::new();
        for (name, value) in parameters.bindings() {
            context.insert(name, value);
        }
        context.insert("definition", document.root());
        context.insert("definition_xml", document.source());

        self.tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| GenerationError::TransformError(error_chain(&e)))
    }
}

fn name_arg(args: &HashMap<String, Value>, filter: &str) -> tera::Result<Option<String>> {
    match args.get("name") {
        None => Ok(None),
        Some(Value::String(name)) => Ok(Some(name.clone())),
        Some(other) => Err(tera::Error::msg(format!(
            "Filter `{filter}` expects `name` to be a string, got {other}"
        ))),
    }
}

fn children<'a>(value: &'a Value, filter: &str) -> tera::Result<&'a Vec<Value>> {
    value
        .get("children")
        .and_then(Value::as_array)
        .ok_or_else(|| tera::Error::msg(format!("Filter `{filter}` must be applied to an element")))
}

fn has_name(element: &Value, name: Option<&str>) -> bool {
    match name {
        None => true,
        Some(name) => element.get("name").and_then(Value::as_str) == Some(name),
    }
}

fn elements_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let name = name_arg(args, "elements")?;
    let matched = children(value, "elements")?
        .iter()
        .filter(|child| has_name(child, name.as_deref()))
        .cloned()
        .collect();
    Ok(Value::Array(matched))
}

fn collect_descendants(element: &Value, name: Option<&str>, out: &mut Vec<Value>) {
    if let Some(children) = element.get("children").and_then(Value::as_array) {
        for child in children {
            if has_name(child, name) {
                out.push(child.clone());
            }
            collect_descendants(child, name, out);
        }
    }
}

fn descendants_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let name = name_arg(args, "descendants")?;
    children(value, "descendants")?;
    let mut matched = Vec::new();
    collect_descendants(value, name.as_deref(), &mut matched);
    Ok(Value::Array(matched))
}

fn attr_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let name = name_arg(args, "attr")?
        .ok_or_else(|| tera::Error::msg("Filter `attr` requires a `name` argument"))?;
    let attributes = value
        .get("attributes")
        .and_then(Value::as_object)
        .ok_or_else(|| tera::Error::msg("Filter `attr` must be applied to an element"))?;

    match (attributes.get(&name), args.get("default")) {
        (Some(found), _) => Ok(found.clone()),
        (None, Some(default)) => Ok(default.clone()),
        (None, None) => {
            let element = value.get("name").and_then(Value::as_str).unwrap_or("?");
            Err(tera::Error::msg(format!(
                "Element <{element}> has no attribute `{name}`"
            )))
        }
    }
}

fn string_arg<'a>(value: &'a Value, filter: &str) -> tera::Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("Filter `{filter}` expects a string, got {value}")))
}

fn pascal_case_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(to_pascal_case(string_arg(value, "pascal_case")?)))
}

fn snake_case_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(to_snake_case(string_arg(value, "snake_case")?)))
}
