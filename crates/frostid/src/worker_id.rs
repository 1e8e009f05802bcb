use crate::ResolveError;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use tracing::debug;

/// Derives a 16-bit worker ID from an IPv4 address: the low two octets,
/// combined as `octet3 << 8 | octet4`.
///
/// Two hosts share a worker ID exactly when their addresses agree in the low
/// two octets, so fleet-wide uniqueness requires an allocation scheme that
/// keeps those octets distinct (a /16-equivalent subnet).
///
/// # Example
///
/// ```
/// use std::net::Ipv4Addr;
/// use frostid::worker_id_from_ip;
///
/// assert_eq!(worker_id_from_ip(Ipv4Addr::new(10, 0, 2, 3)), 515);
/// ```
pub const fn worker_id_from_ip(ip: Ipv4Addr) -> u16 {
    let octets = ip.octets();
    (octets[2] as u16) << 8 | octets[3] as u16
}

/// Resolves a worker ID from the host's outbound IPv4 address.
///
/// Binds a UDP socket and connects it to a public address without sending
/// any packets, so the OS selects the egress interface and binds the socket
/// to its address. The worker ID is then derived from that address via
/// [`worker_id_from_ip`].
///
/// Callers in a subnetted deployment must guarantee that the low two octets
/// are unique across all workers sharing one ID-generation fleet (e.g. a
/// Kubernetes pod CIDR of /16); a collision here produces duplicate
/// identifiers. On failure, supply a fallback worker ID to the generator
/// constructor instead; this function never falls back on its own.
///
/// # Errors
///
/// - [`ResolveError::Io`] when socket setup or the address lookup fails
///   (no route, interface down).
/// - [`ResolveError::NoUsableIpv4`] when the selected local address is
///   loopback or not IPv4.
pub fn resolve_worker_id() -> Result<u16, ResolveError> {
    // Connecting a UDP socket performs no I/O; it only asks the OS which
    // interface would carry outbound traffic.
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect("8.8.8.8:53")?;

    let local = socket.local_addr()?.ip();
    let IpAddr::V4(ip) = local else {
        return Err(ResolveError::NoUsableIpv4 { addr: local });
    };
    if ip.is_loopback() || ip.is_unspecified() {
        return Err(ResolveError::NoUsableIpv4 { addr: local });
    }

    let worker_id = worker_id_from_ip(ip);
    debug!(local_ip = %ip, worker_id, "derived worker id from host address");
    Ok(worker_id)
}
