use {
    super::Strategy,
    crate::{Classification, Error, Result, Shape, classify, shape::RecordShape},
    indexmap::IndexSet,
    serde_json::{Map, Value, json},
    std::any::TypeId,
    tracing::{debug, instrument, trace},
};

/// Rewrites `schema`, the schema of a type with the given `shape`, so that
/// it describes the flat documents of that type.
///
/// Schema and shape are walked together. Inline properties are removed from
/// their parent (and from its `required` list) and re-attached according to
/// `strategy`; every other property is searched for nested inline fields.
/// Records that already appear on the current path are left untouched.
#[instrument(level = "debug", skip_all, fields(strategy = ?strategy))]
pub fn flatten_schema(schema: &mut Value, shape: Shape, strategy: Strategy) -> Result<()> {
    Walk {
        strategy,
        ancestors: IndexSet::new(),
    }
    .node(schema, shape)
}

struct Walk {
    strategy: Strategy,
    /// Records on the current path, innermost last.
    ancestors: IndexSet<TypeId>,
}

impl Walk {
    fn node(&mut self, schema: &mut Value, shape: Shape) -> Result<()> {
        match shape {
            Shape::Leaf(_) | Shape::Skipped => Ok(()),
            Shape::Optional(inner) => self.node(non_null(schema), inner()),
            Shape::Sequence { items, .. } => match schema.get_mut("items") {
                Some(schema) => self.node(schema, items()),
                None => Err(Error::UnsupportedShape {
                    type_name: "sequence",
                    reason: "sequence schema has no items",
                }),
            },
            Shape::Record(record) if self.ancestors.contains(&record.type_id) => {
                debug!(record = record.type_name, "record already on the path");
                Ok(())
            }
            Shape::Record(record) => {
                let node = schema.as_object_mut().ok_or(Error::UnsupportedShape {
                    type_name: record.type_name,
                    reason: "record schema is not an object",
                })?;
                properties(node, &record)?;
                self.ancestors.insert(record.type_id);
                let done = self.record(node, record);
                self.ancestors.pop();
                done
            }
        }
    }

    fn record(&mut self, node: &mut Map<String, Value>, record: RecordShape) -> Result<()> {
        record
            .fields()
            .map(|(field, shape)| (classify(field), shape))
            .filter(|(class, _)| !class.skip)
            .try_for_each(|(class, shape)| match class.inline {
                true => self.inline(node, record, class, shape),
                false => match properties(node, &record)?.get_mut(class.name) {
                    Some(property) => self.node(property, shape),
                    None => Ok(()),
                },
            })
    }

    fn inline(
        &mut self,
        node: &mut Map<String, Value>,
        record: RecordShape,
        class: Classification<'_>,
        shape: Shape,
    ) -> Result<()> {
        let name = class.name;
        let Some(property) = properties(node, &record)?.get_mut(name) else {
            trace!(field = name, "inline field has no property");
            return Ok(());
        };
        let optional = match shape.strip_optional() {
            (Shape::Record(_), optional) => optional,
            _ => {
                return Err(Error::UnsupportedShape {
                    type_name: record.type_name,
                    reason: "inline field is not a record",
                });
            }
        };
        let mut detached = property.take();
        properties(node, &record)?.retain(|key, _| key != name);
        if let Some(Value::Array(required)) = node.get_mut("required") {
            required.retain(|key| key.as_str() != Some(name));
        }

        self.node(&mut detached, shape)?;
        let Value::Object(mut group) = non_null(&mut detached).take() else {
            return Err(Error::UnsupportedShape {
                type_name: record.type_name,
                reason: "inline field schema is not an object",
            });
        };

        match self.strategy {
            Strategy::Alternatives => {
                group.retain(|key, _| key != "type" && !(optional && key == "required"));
                trace!(field = name, "inline field added as an alternative");
                match node.entry("anyOf").or_insert_with(|| json!([])) {
                    Value::Array(alternatives) => alternatives.push(Value::Object(group)),
                    _ => {
                        return Err(Error::UnsupportedShape {
                            type_name: record.type_name,
                            reason: "anyOf is not an array",
                        });
                    }
                }
            }
            Strategy::Merge => {
                if let Some(Value::Object(extra)) = group.remove("properties") {
                    properties(node, &record)?.extend(extra);
                }
                if let Some(Value::Array(extra)) = group.remove("required").filter(|_| !optional) {
                    match node.entry("required").or_insert_with(|| json!([])) {
                        Value::Array(required) => extra.into_iter().for_each(|key| {
                            if !required.contains(&key) {
                                required.push(key);
                            }
                        }),
                        _ => {
                            return Err(Error::UnsupportedShape {
                                type_name: record.type_name,
                                reason: "required is not an array",
                            });
                        }
                    }
                }
                trace!(field = name, "inline field merged");
            }
        }
        Ok(())
    }
}

fn properties<'a>(node: &'a mut Map<String, Value>, record: &RecordShape) -> Result<&'a mut Map<String, Value>> {
    node.get_mut("properties")
        .and_then(Value::as_object_mut)
        .ok_or(Error::UnsupportedShape {
            type_name: record.type_name,
            reason: "record schema has no properties",
        })
}

/// The non-null branch of a `{"anyOf": [schema, {"type": "null"}]}` wrapper,
/// or `schema` itself.
fn non_null(schema: &mut Value) -> &mut Value {
    let wrapped = schema.get("type").is_none()
        && schema
            .get("anyOf")
            .and_then(Value::as_array)
            .is_some_and(|alternatives| {
                alternatives.len() == 2 && alternatives[1] == json!({"type": "null"})
            });
    match wrapped {
        true => &mut schema["anyOf"][0],
        false => schema,
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{ErrorKind, Flatten},
    };

    crate::record! {
        #[derive(Debug, Default)]
        pub struct Town {
            #[tag("city")]
            pub city: String,
            #[tag("zip", omitempty)]
            pub zip: String,
        }
    }

    crate::record! {
        #[derive(Debug, Default)]
        pub struct State {
            #[tag("city")]
            pub city: String,
            #[tag("state")]
            pub state: String,
        }
    }

    crate::record! {
        #[derive(Debug, Default)]
        pub struct Holder {
            #[tag("id")]
            pub id: i64,
            #[tag("", inline)]
            pub town: Town,
            #[tag("", inline)]
            pub state: Option<State>,
        }
    }

    fn unflattened() -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": {"type": "integer"},
                "town": {
                    "type": "object",
                    "properties": {"city": {"type": "string"}, "zip": {"type": "string"}},
                    "required": ["city"],
                },
                "state": {
                    "type": ["object", "null"],
                    "properties": {"city": {"type": "string"}, "state": {"type": "string"}},
                    "required": ["city", "state"],
                },
            },
            "required": ["id", "town", "state"],
        })
    }

    #[test_log::test]
    fn test_alternatives() {
        let mut schema = unflattened();
        flatten_schema(&mut schema, Holder::shape(), Strategy::Alternatives).unwrap();
        assert_eq!(
            schema,
            json!({
                "type": "object",
                "properties": {"id": {"type": "integer"}},
                "required": ["id"],
                "anyOf": [
                    {
                        "properties": {"city": {"type": "string"}, "zip": {"type": "string"}},
                        "required": ["city"],
                    },
                    {
                        "properties": {"city": {"type": "string"}, "state": {"type": "string"}},
                    },
                ],
            })
        );
    }

    #[test_log::test]
    fn test_merge() {
        let mut schema = unflattened();
        flatten_schema(&mut schema, Holder::shape(), Strategy::Merge).unwrap();
        assert_eq!(
            schema,
            json!({
                "type": "object",
                "properties": {
                    "id": {"type": "integer"},
                    "city": {"type": "string"},
                    "zip": {"type": "string"},
                    "state": {"type": "string"},
                },
                "required": ["id", "city"],
            })
        );
    }

    #[test_log::test]
    fn test_nullable_wrapper_is_entered() {
        let mut schema = json!({
            "anyOf": [
                {"type": "object", "properties": {"id": {}, "town": {"type": "object", "properties": {}}}},
                {"type": "null"},
            ],
        });
        flatten_schema(&mut schema, Shape::Optional(<Holder as Flatten>::shape), Strategy::Alternatives)
            .unwrap();
        assert_eq!(schema["anyOf"][0]["properties"], json!({"id": {}}));
        assert_eq!(schema["anyOf"][0]["anyOf"], json!([{"properties": {}}]));
        assert_eq!(schema["anyOf"][1], json!({"type": "null"}));
    }

    #[test_log::test]
    fn test_missing_properties_is_unsupported() {
        let err = flatten_schema(&mut json!({"type": "object"}), Holder::shape(), Strategy::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedShape);

        let sequence = Shape::Sequence {
            items: <Holder as Flatten>::shape,
            len: None,
        };
        let err = flatten_schema(&mut json!({"type": "array"}), sequence, Strategy::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedShape { reason: "sequence schema has no items", .. }));
    }

    crate::record! {
        #[derive(Debug, Default)]
        pub struct Bad {
            #[tag("", inline)]
            pub values: Vec<i64>,
        }
    }

    #[test_log::test]
    fn test_inline_non_record_is_unsupported() {
        let mut schema = json!({
            "type": "object",
            "properties": {"values": {"type": "array", "items": {"type": "integer"}}},
        });
        let err = flatten_schema(&mut schema, Shape::record::<Bad>(), Strategy::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedShape { reason: "inline field is not a record", .. }));
    }
}
