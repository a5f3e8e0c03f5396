//! Configuration-line synthesis for object-group changes

use ipnet::IpNet;

/// Render a network in the device's member syntax. Host networks render
/// `host <address>`; other IPv4 networks render `<network> <netmask>`;
/// other IPv6 networks render `<network>/<prefix>`.
pub fn render_network(net: &IpNet) -> String {
    if net.prefix_len() == net.max_prefix_len() {
        return format!("host {}", net.addr());
    }

    match net {
        IpNet::V4(v4) => format!("{} {}", v4.network(), v4.netmask()),
        IpNet::V6(v6) => format!("{}/{}", v6.network(), v6.prefix_len()),
    }
}

/// Fill out the ordered command batch for one atomic change: the
/// group-selection line first, then one member line per network in input
/// order. Removal prefixes each member line with `no`.
pub fn synthesize(group_id: &str, networks: &[IpNet], removal: bool) -> Vec<String> {
    let mut lines = Vec::with_capacity(networks.len() + 1);
    lines.push(format!("object-group network {group_id}"));

    for net in networks {
        let member = format!("network-object {}", render_network(net));
        if removal {
            lines.push(format!("no {member}"));
        } else {
            lines.push(member);
        }
    }

    lines
}
