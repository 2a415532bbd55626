serde_inline::record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct User {
        #[tag("id")]
        pub id: i64,
        #[tag("name")]
        pub name: String,
        #[tag("email")]
        pub email: String,
        #[tag("", inline)]
        pub china: Option<China>,
        #[tag("", inline)]
        pub usa: Option<Usa>,
    }
}

serde_inline::record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct China {
        #[tag("city", omitempty)]
        pub city: String,
        #[tag("province", omitempty)]
        pub province: String,
        #[tag("", inline)]
        pub nested_foo: Option<NestedFoo>,
    }
}

serde_inline::record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Usa {
        #[tag("city", omitempty)]
        pub city: String,
        #[tag("state", omitempty)]
        pub state: String,
        #[tag("", inline)]
        pub nested_bar: Option<NestedBar>,
    }
}

serde_inline::record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct NestedFoo {
        #[tag("foo_field", omitempty)]
        pub foo_field: String,
    }
}

serde_inline::record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct NestedBar {
        #[tag("bar_field", omitempty)]
        pub bar_field: String,
    }
}
