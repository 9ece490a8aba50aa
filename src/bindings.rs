//! Port and volume shorthand normalization for `run_container`.
//!
//! Callers describe bindings the way they would on a `docker run` command
//! line. These are reshaped into the structured maps the engine's create call
//! expects. Normalization never fails: malformed or unknown values are passed
//! through and the engine decides whether they are valid.

use std::collections::BTreeMap;

use serde::Serialize;

const DEFAULT_PROTOCOL: &str = "tcp";
const DEFAULT_MODE: &str = "rw";

/// Container port (`"80/tcp"`) mapped to an optional host port.
///
/// `None` means the engine picks the host port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PortBindings(BTreeMap<String, Option<String>>);

impl PortBindings {
    /// Parse port shorthands in order. Later entries for the same container
    /// port replace earlier ones.
    ///
    /// Accepted forms: `"8080:80"`, `"8080:80/udp"`, `"80"`, `"80/udp"`.
    pub fn parse<S: AsRef<str>>(specs: &[S]) -> Self {
        let mut map = BTreeMap::new();
        for spec in specs {
            let spec = spec.as_ref();
            match spec.split_once(':') {
                Some((host, container)) => {
                    map.insert(with_protocol(container), Some(host.to_string()));
                }
                None => {
                    map.insert(with_protocol(spec), None);
                }
            }
        }
        Self(map)
    }

    pub fn get(&self, container_port: &str) -> Option<Option<&str>> {
        self.0.get(container_port).map(|h| h.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the bindings back into shorthand form.
    pub fn shorthands(&self) -> Vec<String> {
        self.iter()
            .map(|(container, host)| match host {
                Some(host) => format!("{host}:{container}"),
                None => container.to_string(),
            })
            .collect()
    }
}

fn with_protocol(port: &str) -> String {
    if port.contains('/') {
        port.to_string()
    } else {
        format!("{port}/{DEFAULT_PROTOCOL}")
    }
}

/// Where a volume source is mounted inside the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeTarget {
    pub bind: String,
    pub mode: String,
}

/// Volume source (host path or named volume) mapped to its mount target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VolumeBindings(BTreeMap<String, VolumeTarget>);

impl VolumeBindings {
    /// Parse volume shorthands in order.
    ///
    /// Accepted forms: `"src:dst:mode"`, `"src:dst"` (mode `rw`), and a bare
    /// `"name"`, which mounts the named volume at `name`. Anything after a
    /// third `:` is ignored.
    pub fn parse<S: AsRef<str>>(specs: &[S]) -> Self {
        let mut map = BTreeMap::new();
        for spec in specs {
            let spec = spec.as_ref();
            let mut parts = spec.split(':');
            let source = parts.next().unwrap_or(spec);
            let target = match parts.next() {
                Some(bind) => VolumeTarget {
                    bind: bind.to_string(),
                    mode: parts.next().unwrap_or(DEFAULT_MODE).to_string(),
                },
                None => VolumeTarget {
                    bind: spec.to_string(),
                    mode: DEFAULT_MODE.to_string(),
                },
            };
            map.insert(source.to_string(), target);
        }
        Self(map)
    }

    pub fn get(&self, source: &str) -> Option<&VolumeTarget> {
        self.0.get(source)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VolumeTarget)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the bindings back into `src:dst:mode` shorthand.
    pub fn shorthands(&self) -> Vec<String> {
        self.iter()
            .map(|(source, target)| format!("{source}:{}:{}", target.bind, target.mode))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_and_container_port_defaults_to_tcp() {
        let ports = PortBindings::parse(&["8080:80"]);
        assert_eq!(ports.get("80/tcp"), Some(Some("8080")));
        assert_eq!(ports.len(), 1);
    }

    #[test]
    fn bare_container_port_is_auto_assigned() {
        let ports = PortBindings::parse(&["80"]);
        assert_eq!(ports.get("80/tcp"), Some(None));
    }

    #[test]
    fn explicit_protocol_is_preserved() {
        let ports = PortBindings::parse(&["53:53/udp", "9000/udp", "443/tcp"]);
        assert_eq!(ports.get("53/udp"), Some(Some("53")));
        assert_eq!(ports.get("9000/udp"), Some(None));
        assert_eq!(ports.get("443/tcp"), Some(None));
        assert_eq!(ports.get("53/tcp"), None);
    }

    #[test]
    fn host_ip_stays_in_host_part() {
        // Only the first ':' separates host from container.
        let ports = PortBindings::parse(&["127.0.0.1:8080:80"]);
        assert_eq!(ports.get("8080:80/tcp"), Some(Some("127.0.0.1")));
    }

    #[test]
    fn duplicate_container_port_last_write_wins() {
        let ports = PortBindings::parse(&["8080:80", "9090:80", "80/udp"]);
        assert_eq!(ports.get("80/tcp"), Some(Some("9090")));
        assert_eq!(ports.get("80/udp"), Some(None));
        assert_eq!(ports.len(), 2);
    }

    #[test]
    fn empty_inputs_produce_empty_maps() {
        let none: [&str; 0] = [];
        assert!(PortBindings::parse(&none).is_empty());
        assert!(VolumeBindings::parse(&none).is_empty());
    }

    #[test]
    fn volume_with_mode() {
        let volumes = VolumeBindings::parse(&["/host/data:/data:ro"]);
        let target = volumes.get("/host/data").unwrap();
        assert_eq!(target.bind, "/data");
        assert_eq!(target.mode, "ro");
    }

    #[test]
    fn volume_without_mode_defaults_to_rw() {
        let volumes = VolumeBindings::parse(&["my_volume:/var/lib/app"]);
        let target = volumes.get("my_volume").unwrap();
        assert_eq!(target.bind, "/var/lib/app");
        assert_eq!(target.mode, "rw");
    }

    #[test]
    fn bare_named_volume_mounts_at_its_own_name() {
        let volumes = VolumeBindings::parse(&["cache"]);
        let target = volumes.get("cache").unwrap();
        assert_eq!(target.bind, "cache");
        assert_eq!(target.mode, "rw");
    }

    #[test]
    fn unknown_mode_passes_through() {
        let volumes = VolumeBindings::parse(&["/src:/dst:z", "/a:/b:bogus:extra"]);
        assert_eq!(volumes.get("/src").unwrap().mode, "z");
        let b = volumes.get("/a").unwrap();
        assert_eq!(b.bind, "/b");
        assert_eq!(b.mode, "bogus");
    }

    #[test]
    fn reparsing_shorthands_is_idempotent() {
        let ports = PortBindings::parse(&["8080:80", "53/udp", "9000", "1:2:3"]);
        assert_eq!(PortBindings::parse(&ports.shorthands()), ports);

        let volumes = VolumeBindings::parse(&["/a:/b", "/c:/d:ro", "named"]);
        assert_eq!(VolumeBindings::parse(&volumes.shorthands()), volumes);
    }

    #[test]
    fn port_bindings_serialize_as_plain_map() {
        let ports = PortBindings::parse(&["8080:80", "443"]);
        let json = serde_json::to_value(&ports).unwrap();
        assert_eq!(json, serde_json::json!({"80/tcp": "8080", "443/tcp": null}));
    }
}
