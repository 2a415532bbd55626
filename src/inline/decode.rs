use {
    crate::{Error, Record, Result, SlotMut, classify},
    indexmap::IndexSet,
    serde_json::Value,
    std::{
        any::{TypeId, type_name},
        cell::RefCell,
    },
    tracing::{instrument, trace},
};

thread_local! {
    /// Records being decoded from the current document, innermost last.
    static PATH: RefCell<IndexSet<TypeId>> = Default::default();
}

/// Whether a record of this type is already being decoded from the current
/// document, through a chain of inline fields.
pub(crate) fn on_path(type_id: TypeId) -> bool {
    PATH.with_borrow(|path| path.contains(&type_id))
}

/// Runs `decode` against a document of its own, with an empty path.
pub(crate) fn detached<T>(decode: impl FnOnce() -> Result<T>) -> Result<T> {
    let outer = PATH.take();
    let decoded = decode();
    PATH.set(outer);
    decoded
}

fn within<R: Record>(decode: impl FnOnce() -> Result<R>) -> Result<R> {
    if !PATH.with_borrow_mut(|path| path.insert(TypeId::of::<R>())) {
        return Err(Error::UnsupportedShape {
            type_name: type_name::<R>(),
            reason: "inline record repeats itself",
        });
    }
    let decoded = decode();
    PATH.with_borrow_mut(IndexSet::pop);
    decoded
}

/// Decodes a flat object into `record`.
///
/// Ordinary fields read their own key. Inline fields receive the *whole*
/// document, so sibling inline records may each pick up the same key. The
/// record is rebuilt from its default and only replaced once every field has
/// been decoded. An optional inline record of a type that is already being
/// decoded from the same document is left absent.
#[instrument(level = "trace", skip_all, fields(record = type_name::<R>()))]
pub fn unflatten_record<R: Record>(record: &mut R, document: &Value) -> Result<()> {
    let map = document
        .as_object()
        .ok_or_else(|| Error::unexpected("object", document))?;
    within(|| {
        let mut fresh = R::default();
        R::FIELDS
            .iter()
            .zip(fresh.slots_mut())
            .try_for_each(|(field, slot)| {
                let class = classify(field);
                match (slot, class.inline) {
                    _ if class.skip => Ok(()),
                    (SlotMut::Skipped, _) => Ok(()),
                    (SlotMut::Inline(target), true) => {
                        trace!(field = field.name, "fanning out whole document");
                        target.unflatten(document)
                    }
                    (SlotMut::Plain(target), false) => match map.get(class.name) {
                        None => Ok(()),
                        Some(value) => target.decode(value).map_err(|source| Error::Field {
                            field: class.name.to_string(),
                            source,
                        }),
                    },
                    (SlotMut::Nested(target), false) => match map.get(class.name) {
                        None => Ok(()),
                        Some(value) => detached(|| target.unflatten(value)),
                    },
                    (SlotMut::Inline(_), false) | (SlotMut::Plain(_) | SlotMut::Nested(_), true) => {
                        Err(Error::UnsupportedShape {
                            type_name: type_name::<R>(),
                            reason: "field accessor disagrees with its tag",
                        })
                    }
                }
            })?;
        Ok(fresh)
    })
    .map(|fresh| *record = fresh)
}

#[cfg(test)]
mod tests {
    use {super::*, crate::ErrorKind, serde_json::json};

    crate::record! {
        #[derive(Debug, Default, Clone, PartialEq)]
        pub struct Speed {
            #[tag("limit")]
            pub limit: u32,
        }
    }

    crate::record! {
        #[derive(Debug, Default, Clone, PartialEq)]
        pub struct Road {
            #[tag("name")]
            pub name: String,
            #[tag("lanes")]
            pub lanes: u8,
            #[tag("", inline)]
            pub speed: Option<Speed>,
            #[tag(-)]
            pub visits: u32,
        }
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let mut road = Road::default();
        unflatten_record(&mut road, &json!({"name": "A1"})).unwrap();
        assert_eq!(
            road,
            Road {
                name: "A1".into(),
                lanes: 0,
                speed: Some(Speed { limit: 0 }),
                visits: 0,
            }
        );
    }

    #[test]
    fn test_destination_is_rebuilt() {
        let mut road = Road {
            name: "old".into(),
            lanes: 4,
            speed: None,
            visits: 9,
        };
        unflatten_record(&mut road, &json!({"name": "new", "limit": 80})).unwrap();
        assert_eq!(road.lanes, 0);
        assert_eq!(road.visits, 0);
        assert_eq!(road.speed, Some(Speed { limit: 80 }));
    }

    #[test]
    fn test_type_mismatch_names_field_and_leaves_destination() {
        let mut road = Road {
            name: "kept".into(),
            ..Default::default()
        };
        let err = unflatten_record(&mut road, &json!({"name": "A2", "lanes": "two"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldConversion);
        assert!(matches!(&err, Error::Field { field, .. } if field == "lanes"));
        assert_eq!(road.name, "kept");
    }

    #[test]
    fn test_non_object_document() {
        let err = unflatten_record(&mut Road::default(), &json!([{"name": "A3"}])).unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedShape {
                expected: "object",
                found: "array"
            }
        ));
    }

    #[test]
    fn test_inline_conversion_failure_aborts() {
        let err = unflatten_record(&mut Road::default(), &json!({"limit": -1})).unwrap_err();
        assert!(matches!(&err, Error::Field { field, .. } if field == "limit"));
    }

    crate::record! {
        #[derive(Debug, Default, Clone, PartialEq)]
        pub struct Station {
            #[tag("code")]
            pub code: String,
            #[tag("", inline)]
            pub line: Line,
        }
    }

    crate::record! {
        #[derive(Debug, Default, Clone, PartialEq)]
        pub struct Line {
            #[tag("color")]
            pub color: String,
            #[tag("", inline)]
            pub terminus: Option<Box<Station>>,
        }
    }

    #[test]
    fn test_inline_cycle_through_another_record_stops() {
        let mut station = Station::default();
        unflatten_record(&mut station, &json!({"code": "K1", "color": "red"})).unwrap();
        assert_eq!(station.code, "K1");
        assert_eq!(station.line.color, "red");
        assert_eq!(station.line.terminus, None);
        assert!(!on_path(TypeId::of::<Station>()));
    }
}
