//! JSON Schema for flat documents.
//!
//! [`unflattened_schema_for`] describes a type as if nothing were inlined:
//! leaf values are described by `schemars`, records become plain objects and
//! inline fields are ordinary properties. [`flatten_schema`] then rewrites
//! that schema so it describes what the encoder writes.

use {
    crate::{Error, Flatten, Result, Shape, classify},
    indexmap::IndexSet,
    itertools::Itertools,
    schemars::{Schema, SchemaGenerator, generate::SchemaSettings},
    serde_json::{Map, Value, json},
    std::any::{TypeId, type_name},
    tap::Pipe,
    tracing::{debug, instrument},
};

pub mod flatten;

pub use flatten::flatten_schema;

/// How inline sub-schemas end up in their parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Every inline sub-schema becomes one `anyOf` entry of the parent.
    /// Entries are not exclusive: a flat document usually satisfies several
    /// of them at once.
    #[default]
    Alternatives,
    /// Properties of inline sub-schemas are copied into the parent, the last
    /// declared one winning on a name clash.
    Merge,
}

#[derive(Debug, Clone, Default)]
pub struct SchemaOptions {
    pub settings: SchemaSettings,
    pub strategy: Strategy,
}

impl SchemaOptions {
    pub fn with_strategy(self, strategy: Strategy) -> Self {
        Self { strategy, ..self }
    }
}

/// Schema of the flat documents produced by encoding a `T`.
#[instrument(skip_all, fields(root = type_name::<T>(), strategy = ?options.strategy))]
pub fn schema_for<T: Flatten>(options: SchemaOptions) -> Result<Schema> {
    let SchemaOptions { settings, strategy } = options;
    let (mut schema, header) = generate::<T>(settings);
    flatten_schema(&mut schema, T::shape(), strategy)?;
    finish::<T>(schema, header)
}

/// Schema of `T` with inline fields left as nested properties.
#[instrument(skip_all, fields(root = type_name::<T>()))]
pub fn unflattened_schema_for<T: Flatten>(settings: SchemaSettings) -> Result<Schema> {
    let (schema, header) = generate::<T>(settings);
    finish::<T>(schema, header)
}

/// Top-level keywords added once the body is complete.
struct Header {
    meta_schema: Option<String>,
    definitions: Option<(String, Map<String, Value>)>,
}

fn generate<T: Flatten>(mut settings: SchemaSettings) -> (Value, Header) {
    settings.inline_subschemas = true;
    let meta_schema = settings.meta_schema.as_ref().map(|meta| meta.to_string());
    let definitions_key = settings
        .definitions_path
        .trim_start_matches(['#', '/'])
        .to_string();
    let mut generator = settings.into_generator();
    let schema = describe(T::shape(), &mut generator, &mut IndexSet::new());
    let definitions = generator.definitions().clone();
    let header = Header {
        meta_schema,
        definitions: (!definitions.is_empty()).then_some((definitions_key, definitions)),
    };
    (schema, header)
}

fn finish<T>(schema: Value, header: Header) -> Result<Schema> {
    match schema {
        Value::Object(body) => header
            .meta_schema
            .map(|meta| ("$schema".to_string(), Value::String(meta)))
            .into_iter()
            .chain(body)
            .chain(
                header
                    .definitions
                    .map(|(key, definitions)| (key, Value::Object(definitions))),
            )
            .collect::<Map<_, _>>()
            .pipe(Schema::from)
            .pipe(Ok),
        Value::Bool(accept) => Ok(Schema::from(accept)),
        _ => Err(Error::UnsupportedShape {
            type_name: type_name::<T>(),
            reason: "schema is neither an object nor a boolean",
        }),
    }
}

/// Describes `shape` without resolving inline fields.
///
/// `ancestors` holds the records on the current path; a record that is
/// already on it is described as a bare object.
fn describe(shape: Shape, generator: &mut SchemaGenerator, ancestors: &mut IndexSet<TypeId>) -> Value {
    match shape {
        Shape::Leaf(leaf) => leaf(generator).to_value(),
        Shape::Skipped => Value::Bool(true),
        Shape::Optional(inner) => describe(inner(), generator, ancestors).nullable(),
        Shape::Sequence { items, len } => {
            let mut node = json!({
                "type": "array",
                "items": describe(items(), generator, ancestors),
            });
            if let Some(len) = len {
                node["minItems"] = len.into();
                node["maxItems"] = len.into();
            }
            node
        }
        Shape::Record(record) if ancestors.contains(&record.type_id) => {
            debug!(record = record.type_name, "recursive record described as a bare object");
            json!({"type": "object"})
        }
        Shape::Record(record) => {
            ancestors.insert(record.type_id);
            let fields = record
                .fields()
                .map(|(field, shape)| (classify(field), shape))
                .filter(|(class, _)| !class.skip)
                .map(|(class, shape)| (class, describe(shape, generator, ancestors)))
                .collect_vec();
            ancestors.pop();
            let required = fields
                .iter()
                .filter(|(class, _)| !class.omit_empty)
                .map(|(class, _)| class.name)
                .collect_vec();
            let properties = fields
                .into_iter()
                .map(|(class, schema)| (class.name.to_string(), schema))
                .collect::<Map<_, _>>();
            json!({
                "type": "object",
                "properties": properties,
                "required": required,
            })
        }
    }
}

#[extension_traits::extension(trait NullableExt)]
impl Value {
    /// Same schema, also accepting `null`.
    fn nullable(mut self) -> Value {
        let Some(ty) = self.get_mut("type") else {
            return match self {
                Value::Bool(true) => self,
                other => json!({"anyOf": [other, {"type": "null"}]}),
            };
        };
        match ty {
            Value::Array(types) if !types.iter().any(|ty| *ty == "null") => types.push("null".into()),
            Value::String(_) if *ty != "null" => *ty = json!([ty.take(), "null"]),
            _ => {}
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    crate::record! {
        #[derive(Debug, Default)]
        pub struct Limits {
            #[tag("max", omitempty)]
            pub max: u32,
        }
    }

    crate::record! {
        #[derive(Debug, Default)]
        pub struct Job {
            #[tag("id")]
            pub id: String,
            #[tag("", inline)]
            pub limits: Option<Limits>,
            #[tag("steps", nested)]
            pub steps: [Limits; 2],
            #[tag(-)]
            pub secret: String,
        }
    }

    #[test]
    fn test_unflattened_keeps_inline_property() {
        let schema = unflattened_schema_for::<Job>(SchemaSettings::default()).unwrap();
        let schema = schema.as_value();
        assert_eq!(schema["$schema"], json!("https://json-schema.org/draft/2020-12/schema"));
        assert_eq!(schema["required"], json!(["id", "limits", "steps"]));
        assert_eq!(schema["properties"]["id"], json!({"type": "string"}));
        assert_eq!(schema["properties"]["limits"]["type"], json!(["object", "null"]));
        assert_eq!(schema["properties"]["limits"]["required"], json!([]));
        assert_eq!(schema["properties"]["steps"]["minItems"], json!(2));
        assert_eq!(schema["properties"]["steps"]["maxItems"], json!(2));
        assert!(schema["properties"].get("secret").is_none());
        assert!(schema["properties"].get("limits").is_some());
    }

    #[test]
    fn test_nullable() {
        assert_eq!(json!({"type": "object"}).nullable(), json!({"type": ["object", "null"]}));
        assert_eq!(json!({"type": ["integer", "null"]}).nullable(), json!({"type": ["integer", "null"]}));
        assert_eq!(json!({"type": "null"}).nullable(), json!({"type": "null"}));
        assert_eq!(json!(true).nullable(), json!(true));
        assert_eq!(
            json!({"enum": ["a"]}).nullable(),
            json!({"anyOf": [{"enum": ["a"]}, {"type": "null"}]})
        );
    }

    #[test]
    fn test_meta_schema_can_be_dropped() {
        let mut options = SchemaOptions::default();
        options.settings.meta_schema = None;
        let schema = schema_for::<Limits>(options).unwrap();
        assert!(schema.as_value().get("$schema").is_none());
        assert_eq!(schema.as_value()["properties"]["max"]["minimum"], json!(0));
    }
}
