/// Declares a struct and implements [`Record`](crate::Record) and
/// [`Flatten`](crate::Flatten) for it.
///
/// Every field may carry one `#[tag(...)]` attribute:
///
/// * `#[tag("city", omitempty)]` writes the field as `city`, omitted when absent
///   (or empty, unless the field is an `Option`);
/// * `#[tag("", inline)]` merges the field's own fields into the parent;
/// * `#[tag("home", nested)]` writes a record-typed field under `home`, with
///   the inline fields of that record resolved;
/// * `#[tag(-)]` never reads or writes the field.
///
/// Ordinary fields need `Serialize`, `DeserializeOwned` and `JsonSchema`;
/// `inline` and `nested` fields need [`Flatten`](crate::Flatten). Fields
/// without `pub` are skipped as well, but still need the bounds of an
/// ordinary field unless tagged `-`. Doc comments go before the tag.
///
/// ```
/// serde_inline::record! {
///     #[derive(Debug, Default, PartialEq)]
///     pub struct Address {
///         #[tag("city", omitempty)]
///         pub city: String,
///     }
/// }
///
/// serde_inline::record! {
///     #[derive(Debug, Default, PartialEq)]
///     pub struct User {
///         #[tag("id")]
///         pub id: i64,
///         #[tag("", inline)]
///         pub address: Option<Address>,
///     }
/// }
///
/// let user = User { id: 1, address: Some(Address { city: "Oslo".into() }) };
/// assert_eq!(serde_inline::to_string(&user).unwrap(), r#"{"id":1,"city":"Oslo"}"#);
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[doc = $doc:expr])*
                $(#[tag($($tag:tt)*)])?
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[doc = $doc])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Record for $name {
            const FIELDS: &'static [$crate::Field] = &[
                $(
                    $crate::Field {
                        name: stringify!($field),
                        public: !stringify!($field_vis).is_empty(),
                        tag: $crate::__record_tag!($($($tag)*)?),
                    },
                )*
            ];

            fn slots(&self) -> ::std::vec::Vec<$crate::Slot<'_>> {
                ::std::vec![
                    $(
                        $crate::__record_kind!(
                            [$($($tag)*)?]
                            inline { $crate::Slot::Inline(&self.$field) }
                            nested { $crate::Slot::Nested(&self.$field) }
                            plain { $crate::Slot::Plain(&self.$field) }
                            skipped { $crate::Slot::Skipped }
                        ),
                    )*
                ]
            }

            fn slots_mut(&mut self) -> ::std::vec::Vec<$crate::SlotMut<'_>> {
                ::std::vec![
                    $(
                        $crate::__record_kind!(
                            [$($($tag)*)?]
                            inline { $crate::SlotMut::Inline(&mut self.$field) }
                            nested { $crate::SlotMut::Nested(&mut self.$field) }
                            plain { $crate::SlotMut::Plain(&mut self.$field) }
                            skipped { $crate::SlotMut::Skipped }
                        ),
                    )*
                ]
            }

            fn shapes() -> ::std::vec::Vec<$crate::Shape> {
                ::std::vec![
                    $(
                        $crate::__record_kind!(
                            [$($($tag)*)?]
                            inline { <$ty as $crate::Flatten>::shape() }
                            nested { <$ty as $crate::Flatten>::shape() }
                            plain { $crate::Shape::leaf::<$ty>() }
                            skipped { $crate::Shape::Skipped }
                        ),
                    )*
                ]
            }
        }

        impl $crate::Flatten for $name {
            fn shape() -> $crate::Shape {
                $crate::Shape::record::<Self>()
            }

            fn flatten(&self) -> $crate::Result<$crate::__private::Value> {
                $crate::flatten_record(self).map($crate::__private::Value::Object)
            }

            fn unflatten(&mut self, document: &$crate::__private::Value) -> $crate::Result<()> {
                $crate::unflatten_record(self, document)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_tag {
    () => {
        ""
    };
    (-) => {
        "-"
    };
    ($name:literal $(, $setting:ident)* $(,)?) => {
        concat!($name $(, ",", stringify!($setting))*)
    };
}

/// Picks one of four token groups from the tokens of a tag.
#[doc(hidden)]
#[macro_export]
macro_rules! __record_kind {
    ([- $($rest:tt)*] inline $inline:tt nested $nested:tt plain $plain:tt skipped $skipped:tt) => {
        $skipped
    };
    (["-" $($rest:tt)*] inline $inline:tt nested $nested:tt plain $plain:tt skipped $skipped:tt) => {
        $skipped
    };
    ([inline $($rest:tt)*] inline $inline:tt nested $nested:tt plain $plain:tt skipped $skipped:tt) => {
        $inline
    };
    ([nested $($rest:tt)*] inline $inline:tt nested $nested:tt plain $plain:tt skipped $skipped:tt) => {
        $nested
    };
    ([$head:tt $($rest:tt)*] inline $inline:tt nested $nested:tt plain $plain:tt skipped $skipped:tt) => {
        $crate::__record_kind!([$($rest)*] inline $inline nested $nested plain $plain skipped $skipped)
    };
    ([] inline $inline:tt nested $nested:tt plain $plain:tt skipped $skipped:tt) => {
        $plain
    };
}

#[cfg(test)]
mod tests {
    use crate::{Field, Record, Shape, Slot, classify};

    crate::record! {
        #[derive(Debug, Default, Clone, PartialEq)]
        pub struct Inner {
            #[tag("value", omitempty)]
            pub value: i32,
        }
    }

    crate::record! {
        #[derive(Debug, Default, Clone, PartialEq)]
        pub struct Outer {
            #[tag("id")]
            pub id: u64,
            pub label: String,
            #[tag("", inline)]
            pub inner: Option<Inner>,
            #[tag(-)]
            pub cache: std::cell::Cell<u8>,
            hidden: bool,
        }
    }

    #[test]
    fn test_field_table_follows_declaration() {
        assert_eq!(
            Outer::FIELDS,
            &[
                Field { name: "id", public: true, tag: "id" },
                Field { name: "label", public: true, tag: "" },
                Field { name: "inner", public: true, tag: ",inline" },
                Field { name: "cache", public: true, tag: "-" },
                Field { name: "hidden", public: false, tag: "" },
            ]
        );
        assert_eq!(Inner::FIELDS[0].tag, "value,omitempty");
    }

    #[test]
    fn test_slot_kinds_agree_with_classification() {
        let outer = Outer::default();
        assert!(!outer.hidden);
        Outer::FIELDS
            .iter()
            .zip(outer.slots())
            .for_each(|(field, slot)| {
                let class = classify(field);
                match slot {
                    Slot::Inline(_) => assert!(class.inline, "{field:?}"),
                    Slot::Plain(_) | Slot::Nested(_) => assert!(!class.inline, "{field:?}"),
                    Slot::Skipped => assert!(class.skip, "{field:?}"),
                }
            });
    }

    #[test]
    fn test_shapes_are_aligned() {
        let shapes = Outer::shapes();
        assert_eq!(shapes.len(), Outer::FIELDS.len());
        assert!(matches!(shapes[0], Shape::Leaf(_)));
        assert!(matches!(shapes[2], Shape::Optional(_)));
        assert!(matches!(shapes[3], Shape::Skipped));
    }
}
