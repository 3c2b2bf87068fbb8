//! CloudFormation JSON rendering.
//!
//! Deferred references become intrinsic functions:
//!
//! | Expr | Rendered |
//! |------|----------|
//! | `Ref(id)` | `{"Ref": id}` |
//! | `Attr { resource, attribute }` | `{"Fn::GetAtt": [resource, attribute]}` |
//! | `Pseudo(p)` | `{"Ref": "AWS::..."}` |
//! | `Interpolate(s)` | `{"Fn::Sub": s}` |
//! | `Concat(parts)` | `{"Fn::Join": ["", parts]}` |

use serde_json::{json, Map, Value};

use super::{Expr, Resource, ResourceMap};

/// Render a single expression.
pub fn render_expr(expr: &Expr) -> Value {
    match expr {
        Expr::Bool(b) => Value::Bool(*b),
        Expr::Int(n) => Value::from(*n),
        Expr::Str(s) => Value::String(s.clone()),
        Expr::List(items) => Value::Array(items.iter().map(render_expr).collect()),
        Expr::Map(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), render_expr(v)))
                .collect(),
        ),
        Expr::Json(value) => value.clone(),
        Expr::Ref(resource) => json!({ "Ref": resource }),
        Expr::Attr {
            resource,
            attribute,
        } => json!({ "Fn::GetAtt": [resource, attribute] }),
        Expr::Pseudo(p) => json!({ "Ref": p.name() }),
        Expr::Interpolate(template) => json!({ "Fn::Sub": template }),
        Expr::Concat(parts) => {
            let parts: Vec<Value> = parts.iter().map(render_expr).collect();
            json!({ "Fn::Join": ["", parts] })
        }
    }
}

/// Render a resource declaration as `{"Type": ..., "Properties": {...}}`.
pub fn render_resource(resource: &Resource) -> Value {
    let properties: Map<String, Value> = resource
        .properties
        .iter()
        .map(|(k, v)| (k.clone(), render_expr(v)))
        .collect();

    let mut decl = Map::new();
    decl.insert("Type".to_string(), Value::String(resource.resource_type.to_string()));
    decl.insert("Properties".to_string(), Value::Object(properties));
    Value::Object(decl)
}

/// Render every declaration of a map, preserving its order.
pub fn render_map(map: &ResourceMap) -> Map<String, Value> {
    map.iter()
        .map(|(id, resource)| (id.to_string(), render_resource(resource)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Pseudo;

    #[test]
    fn test_render_literals() {
        assert_eq!(render_expr(&Expr::Bool(true)), json!(true));
        assert_eq!(render_expr(&Expr::Int(24)), json!(24));
        assert_eq!(render_expr(&"GZIP".into()), json!("GZIP"));
        assert_eq!(
            render_expr(&Expr::strings(["a", "b"])),
            json!(["a", "b"])
        );
    }

    #[test]
    fn test_render_references() {
        assert_eq!(
            render_expr(&Expr::reference("LogGroup")),
            json!({ "Ref": "LogGroup" })
        );
        assert_eq!(
            render_expr(&Expr::arn("Bucket")),
            json!({ "Fn::GetAtt": ["Bucket", "Arn"] })
        );
        assert_eq!(
            render_expr(&Expr::Pseudo(Pseudo::AccountId)),
            json!({ "Ref": "AWS::AccountId" })
        );
        assert_eq!(
            render_expr(&Expr::interpolate("s3.${AWS::Region}.amazonaws.com")),
            json!({ "Fn::Sub": "s3.${AWS::Region}.amazonaws.com" })
        );
        assert_eq!(
            render_expr(&Expr::concat([Expr::arn("Bucket"), "/*".into()])),
            json!({ "Fn::Join": ["", [{ "Fn::GetAtt": ["Bucket", "Arn"] }, "/*"]] })
        );
    }

    #[test]
    fn test_render_json_passthrough() {
        let tags = json!({ "team": "data", "cost": { "center": 42 } });
        assert_eq!(render_expr(&Expr::Json(tags.clone())), tags);
    }

    #[test]
    fn test_render_resource_shape() {
        let resource = Resource::new("AWS::Logs::LogGroup").with("RetentionInDays", 30u32);
        assert_eq!(
            render_resource(&resource),
            json!({
                "Type": "AWS::Logs::LogGroup",
                "Properties": { "RetentionInDays": 30 }
            })
        );
    }

    #[test]
    fn test_render_map_preserves_order() {
        let mut map = ResourceMap::new();
        map.insert("Zeta", Resource::new("T"));
        map.insert("Alpha", Resource::new("T"));

        let rendered = render_map(&map);
        let keys: Vec<&String> = rendered.keys().collect();
        assert_eq!(keys, vec!["Zeta", "Alpha"]);
    }
}
