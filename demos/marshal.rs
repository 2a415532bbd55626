//! Writes a list of DNS server options, each with the settings of its
//! transport inlined.

mod options;

use {
    anyhow::{Context, Result},
    options::{
        DialerOption, DnsServerOption, LocalDnsServerOption, ServerOptions, TlsDnsServerOption,
        UdpDnsServerOption,
    },
    serde_json::json,
};

fn main() -> Result<()> {
    let options = vec![
        DnsServerOption {
            kind: "local".into(),
            tag: "local-dns".into(),
            local: LocalDnsServerOption { prefer_go: true },
            ..Default::default()
        },
        DnsServerOption {
            kind: "udp".into(),
            tag: "udp-dns".into(),
            udp: UdpDnsServerOption {
                server: ServerOptions {
                    server: "1.1.1.1".into(),
                    server_port: 53,
                },
                dialer: DialerOption { timeout: 10 },
            },
            ..Default::default()
        },
        DnsServerOption {
            kind: "tls".into(),
            tag: "tls-dns".into(),
            tls: TlsDnsServerOption {
                server: ServerOptions {
                    server: "dns.google".into(),
                    server_port: 853,
                },
                tls: Some(json!({"sni": "dns.google"})),
            },
            ..Default::default()
        },
    ];

    serde_inline::to_string_pretty(&options)
        .context("encoding options")
        .map(|output| println!("{output}"))
}
