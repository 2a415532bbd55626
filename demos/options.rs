use serde_json::Value;

serde_inline::record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct DnsServerOption {
        #[tag("type")]
        pub kind: String,
        #[tag("tag")]
        pub tag: String,
        #[tag("", inline)]
        pub local: LocalDnsServerOption,
        #[tag("", inline)]
        pub udp: UdpDnsServerOption,
        #[tag("", inline)]
        pub tls: TlsDnsServerOption,
    }
}

serde_inline::record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct LocalDnsServerOption {
        #[tag("prefer_go", omitempty)]
        pub prefer_go: bool,
    }
}

serde_inline::record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct ServerOptions {
        #[tag("server", omitempty)]
        pub server: String,
        #[tag("server_port", omitempty)]
        pub server_port: u16,
    }
}

serde_inline::record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct UdpDnsServerOption {
        #[tag("", inline)]
        pub server: ServerOptions,
        #[tag("", inline)]
        pub dialer: DialerOption,
    }
}

serde_inline::record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct DialerOption {
        /// Seconds.
        #[tag("timeout", omitempty)]
        pub timeout: u64,
    }
}

serde_inline::record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct TlsDnsServerOption {
        #[tag("", inline)]
        pub server: ServerOptions,
        #[tag("tls", omitempty)]
        pub tls: Option<Value>,
    }
}
