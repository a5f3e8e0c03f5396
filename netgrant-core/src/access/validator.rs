//! Requested-network validation against the permitted ranges

use ipnet::IpNet;
use std::net::IpAddr;
use tracing::debug;

/// A request accepted by [`validate`]: the parsed requested network together
/// with the permitted range it fell within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeMatch {
    pub requested: IpNet,
    pub permitted: IpNet,
}

/// Parse a network string. A bare address gets its host prefix
/// (/32 for IPv4, /128 for IPv6).
pub fn parse_network(input: &str) -> Option<IpNet> {
    if let Ok(net) = input.parse::<IpNet>() {
        return Some(net);
    }
    input.parse::<IpAddr>().ok().map(IpNet::from)
}

/// Check a requested network against each permitted range in list order and
/// return the first range that contains it.
///
/// Containment is exact supernet equality: the request's ancestor at the
/// permitted prefix length must equal the permitted range. Overlap alone is
/// not enough, and a request wider than a range is never contained in it.
/// Malformed input reports no match rather than an error.
pub fn validate(requested: &str, ranges: &[IpNet]) -> Option<RangeMatch> {
    let Some(net) = parse_network(requested) else {
        debug!("Rejecting {requested}: not a valid network or address");
        return None;
    };

    for range in ranges {
        if ancestor_at(&net, range.prefix_len()) == Some(range.trunc()) {
            return Some(RangeMatch {
                requested: net,
                permitted: *range,
            });
        }
    }

    debug!("Rejecting {requested}: outside every permitted range");
    None
}

/// The network's ancestor at `prefix_len`. None when the network is wider
/// than that prefix. A cross-family prefix yields an ancestor in the
/// request's own family, which can never equal the compared range.
fn ancestor_at(net: &IpNet, prefix_len: u8) -> Option<IpNet> {
    if net.prefix_len() < prefix_len {
        return None;
    }
    IpNet::new(net.addr(), prefix_len).ok().map(|n| n.trunc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(specs: &[&str]) -> Vec<IpNet> {
        specs.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_host_within_range() {
        let permitted = ranges(&["10.0.0.0/24"]);

        let m = validate("10.0.0.5/32", &permitted).unwrap();
        assert_eq!(m.requested.to_string(), "10.0.0.5/32");
        assert_eq!(m.permitted, permitted[0]);
    }

    #[test]
    fn test_bare_address_implies_host_prefix() {
        let permitted = ranges(&["10.0.0.0/24", "2001:db8::/32"]);

        let v4 = validate("10.0.0.5", &permitted).unwrap();
        assert_eq!(v4.requested.prefix_len(), 32);

        let v6 = validate("2001:db8::1", &permitted).unwrap();
        assert_eq!(v6.requested.prefix_len(), 128);
        assert_eq!(v6.permitted, permitted[1]);
    }

    #[test]
    fn test_range_itself_matches() {
        let permitted = ranges(&["10.0.0.0/24"]);
        let m = validate("10.0.0.0/24", &permitted).unwrap();
        assert_eq!(m.requested, m.permitted);
    }

    #[test]
    fn test_outside_every_range() {
        let permitted = ranges(&["10.0.0.0/24"]);
        assert!(validate("192.168.1.1", &permitted).is_none());
    }

    #[test]
    fn test_same_prefix_length_different_bits() {
        // Sharing a prefix length is not containment
        let permitted = ranges(&["10.0.0.0/8"]);
        assert!(validate("11.0.0.0/8", &permitted).is_none());
    }

    #[test]
    fn test_wider_request_is_rejected() {
        let permitted = ranges(&["10.0.0.0/24"]);
        assert!(validate("10.0.0.0/8", &permitted).is_none());
    }

    #[test]
    fn test_first_match_wins_in_declaration_order() {
        let permitted = ranges(&["10.0.0.0/8", "10.0.0.0/24"]);
        let m = validate("10.0.0.5", &permitted).unwrap();
        assert_eq!(m.permitted, permitted[0]);
    }

    #[test]
    fn test_family_mismatch_never_matches() {
        let permitted = ranges(&["10.0.0.0/24"]);
        assert!(validate("::ffff:10.0.0.5", &permitted).is_none());

        let permitted = ranges(&["2001:db8::/32"]);
        assert!(validate("10.0.0.5", &permitted).is_none());
    }

    #[test]
    fn test_malformed_input_reports_no_match() {
        let permitted = ranges(&["10.0.0.0/24"]);
        assert!(validate("10.0.0.5/33", &permitted).is_none());
        assert!(validate("not-a-network", &permitted).is_none());
        assert!(validate("", &permitted).is_none());
    }

    #[test]
    fn test_empty_range_set_fails_closed() {
        assert!(validate("10.0.0.5", &[]).is_none());
    }

    #[test]
    fn test_all_hosts_within_small_range_match() {
        let permitted = ranges(&["192.0.2.0/30"]);
        for last in 0..4 {
            let addr = format!("192.0.2.{last}");
            let m = validate(&addr, &permitted).unwrap();
            assert_eq!(m.permitted, permitted[0]);
        }
        assert!(validate("192.0.2.4", &permitted).is_none());
    }
}
