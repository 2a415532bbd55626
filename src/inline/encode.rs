use {
    super::{ValueEmptyExt, kind_of},
    crate::{Error, Record, Result, Slot, classify},
    serde_json::{Map, Value},
    std::any::type_name,
    tracing::{instrument, trace},
};

/// Flattens one record into a flat object.
///
/// Fields are visited in declaration order and written into a single map, so
/// a key written by a later field replaces the value of an earlier one.
#[instrument(level = "trace", skip_all, fields(record = type_name::<R>()))]
pub fn flatten_record<R: Record>(record: &R) -> Result<Map<String, Value>> {
    R::FIELDS
        .iter()
        .zip(record.slots())
        .try_fold(Map::new(), |mut out, (field, slot)| {
            let class = classify(field);
            match (slot, class.inline) {
                _ if class.skip => {}
                (Slot::Skipped, _) => {}
                (Slot::Inline(value), true) => match value.flatten()? {
                    Value::Null => trace!(field = field.name, "absent inline field omitted"),
                    Value::Object(fields) => out.extend(fields),
                    other => {
                        return Err(Error::InlineNotObject {
                            field: field.name.to_string(),
                            found: kind_of(&other),
                        });
                    }
                },
                (Slot::Plain(value), false) => value
                    .encode()
                    .map_err(|source| Error::Field {
                        field: class.name.to_string(),
                        source,
                    })
                    .map(|encoded| {
                        // Optionals are omitted only when absent.
                        let omit = match encoded {
                            Value::Null => true,
                            _ => !value.nullable() && encoded.is_empty_value(),
                        };
                        write(&mut out, class.name, encoded, class.omit_empty && omit)
                    })?,
                (Slot::Nested(value), false) => {
                    let encoded = value.flatten()?;
                    let omit = encoded.is_null() || encoded.as_array().is_some_and(Vec::is_empty);
                    write(&mut out, class.name, encoded, class.omit_empty && omit)
                }
                (Slot::Inline(_), false) | (Slot::Plain(_) | Slot::Nested(_), true) => {
                    return Err(Error::UnsupportedShape {
                        type_name: type_name::<R>(),
                        reason: "field accessor disagrees with its tag",
                    });
                }
            }
            Ok(out)
        })
}

fn write(out: &mut Map<String, Value>, key: &str, value: Value, omit: bool) {
    match omit {
        true => trace!(field = key, "empty field omitted"),
        false => {
            out.insert(key.to_string(), value);
        }
    }
}
