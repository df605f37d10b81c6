pub const MAINNET_RPC: &str = "https://fullnode.mainnet.sui.io/";
pub const TESTNET_RPC: &str = "https://fullnode.testnet.sui.io/";
pub const DEVNET_RPC: &str = "https://fullnode.devnet.sui.io/";

pub fn infer_network_from_url(url: &str) -> Option<&'static str> {
    let lower = url.to_lowercase();
    if lower.contains("testnet") {
        Some("testnet")
    } else if lower.contains("devnet") {
        Some("devnet")
    } else if lower.contains("mainnet") {
        Some("mainnet")
    } else {
        None
    }
}

pub fn default_rpc_endpoint(network: &str) -> String {
    match network {
        "testnet" => TESTNET_RPC.to_string(),
        "devnet" => DEVNET_RPC.to_string(),
        _ => MAINNET_RPC.to_string(),
    }
}

/// Scheme and authority of `url` (`https://host:port`), used as the `Origin`
/// header for services that expect browser traffic.
pub fn origin_of(url: &str) -> Option<String> {
    let (scheme, rest) = url.split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    if scheme.is_empty() || authority.is_empty() {
        return None;
    }
    Some(format!("{}://{}", scheme, authority))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_network() {
        assert_eq!(
            infer_network_from_url("https://fullnode.testnet.sui.io/"),
            Some("testnet")
        );
        assert_eq!(infer_network_from_url("http://127.0.0.1:9000"), None);
        assert_eq!(default_rpc_endpoint("unknown"), MAINNET_RPC);
    }

    #[test]
    fn test_origin_of() {
        assert_eq!(
            origin_of("https://api.example.com/graphql?x=1").as_deref(),
            Some("https://api.example.com")
        );
        assert_eq!(
            origin_of("http://127.0.0.1:8080").as_deref(),
            Some("http://127.0.0.1:8080")
        );
        assert_eq!(origin_of("not a url"), None);
    }
}
