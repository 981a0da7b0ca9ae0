//! JSON interchange for code generators.
//!
//! Top level: declaration keyword -> name -> node. Struct-like kinds map the
//! name straight to the field array. Comments and optional parts are
//! omitted when absent; kinds that never occur are omitted too.

use crate::ast::*;
use serde_json::{json, Map, Value};

pub fn to_json(ast: &ThriftAst) -> Value {
    let mut root = Map::new();
    for kind in ast.kinds() {
        let Some(subjects) = ast.get(kind) else {
            continue;
        };
        let mut by_name = Map::new();
        for (name, subject) in subjects {
            by_name.insert(name.clone(), serialize_subject(subject));
        }
        root.insert(kind.as_str().to_owned(), Value::Object(by_name));
    }
    Value::Object(root)
}

fn serialize_subject(subject: &Subject) -> Value {
    let mut node = Map::new();
    match subject {
        Subject::Namespace(ns) => {
            node.insert("value".to_owned(), json!(ns.path));
        }
        Subject::Include(inc) => {
            node.insert("value".to_owned(), json!(inc.path));
        }
        Subject::Typedef(t) => {
            node.insert("type".to_owned(), serialize_type(&t.type_));
        }
        Subject::Const(c) => {
            node.insert("type".to_owned(), serialize_type(&c.type_));
            node.insert("value".to_owned(), serialize_literal(&c.value));
        }
        Subject::Enum(e) => {
            let items: Vec<Value> = e.items.iter().map(serialize_enum_item).collect();
            node.insert("items".to_owned(), Value::Array(items));
        }
        Subject::Struct(s) | Subject::Union(s) | Subject::Exception(s) => {
            return serialize_fields(&s.fields);
        }
        Subject::Service(svc) => {
            if let Some(parent) = &svc.extends {
                node.insert("extends".to_owned(), json!(parent));
            }
            let mut functions = Map::new();
            for (name, f) in &svc.functions {
                functions.insert(name.clone(), serialize_function(f));
            }
            node.insert("functions".to_owned(), Value::Object(functions));
        }
    }
    insert_comments(&mut node, subject.comments());
    Value::Object(node)
}

pub fn serialize_type(t: &TypeRef) -> Value {
    match t {
        TypeRef::Scalar(name) => json!(name),
        TypeRef::Map { key, value } => json!({
            "name": "map",
            "keyType": serialize_type(key),
            "valueType": serialize_type(value),
        }),
        TypeRef::ListLike { kind, value } => json!({
            "name": kind.as_str(),
            "valueType": serialize_type(value),
        }),
    }
}

pub fn serialize_literal(lit: &Literal) -> Value {
    match lit {
        Literal::Int(n) | Literal::Hex(n) => json!(n),
        // Non-finite floats have no JSON form and serialize as null.
        Literal::Double(f) | Literal::Exponent(f) => json!(f),
        Literal::Bool(b) => json!(b),
        Literal::Str(s) => json!(s),
        Literal::List(items) => Value::Array(items.iter().map(serialize_literal).collect()),
        Literal::Map(pairs) => Value::Array(
            pairs
                .iter()
                .map(|(k, v)| {
                    json!({
                        "key": serialize_literal(k),
                        "value": serialize_literal(v),
                    })
                })
                .collect(),
        ),
        Literal::Ref(segments) => json!({ "ref": segments.join(".") }),
    }
}

fn serialize_enum_item(item: &EnumItem) -> Value {
    let mut node = Map::new();
    node.insert("name".to_owned(), json!(item.name));
    node.insert("value".to_owned(), json!(item.value));
    insert_comments(&mut node, &item.comments);
    Value::Object(node)
}

fn serialize_fields(fields: &[Field]) -> Value {
    Value::Array(fields.iter().map(serialize_field).collect())
}

fn serialize_field(field: &Field) -> Value {
    let mut node = Map::new();
    if let Some(id) = field.id {
        node.insert("id".to_owned(), json!(id));
    }
    if let Some(q) = field.qualifier {
        node.insert("option".to_owned(), json!(q.as_str()));
    }
    node.insert("type".to_owned(), serialize_type(&field.type_));
    node.insert("name".to_owned(), json!(field.name));
    if let Some(default) = &field.default {
        node.insert("value".to_owned(), serialize_literal(default));
    }
    insert_comments(&mut node, &field.comments);
    Value::Object(node)
}

fn serialize_function(f: &Function) -> Value {
    let mut node = Map::new();
    node.insert("type".to_owned(), serialize_type(&f.returns));
    node.insert("name".to_owned(), json!(f.name));
    node.insert("args".to_owned(), serialize_fields(&f.args));
    node.insert("throws".to_owned(), serialize_fields(&f.throws));
    node.insert("oneway".to_owned(), json!(f.oneway));
    insert_comments(&mut node, &f.comments);
    Value::Object(node)
}

fn insert_comments(node: &mut Map<String, Value>, comments: &Comments) {
    if let Some(head) = &comments.head {
        node.insert("headComment".to_owned(), json!(head));
    }
    if let Some(tail) = &comments.tail {
        node.insert("tailComment".to_owned(), json!(tail));
    }
}
