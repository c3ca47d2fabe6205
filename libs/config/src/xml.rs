//! `<hazelcast-client>` XML document loader.
//!
//! Only the elements a discovery-backed client acts on are read; everything
//! else in the schema (near caches, serialization, listeners…) belongs to
//! features outside this crate and is skipped.

use std::{str::FromStr, time::Duration};

use roxmltree::{Document, Node};
use tracing::{debug, trace};

use crate::{ClientConfig, ConfigParseError, NetworkConfig};

/// root element of a client configuration document
pub const ROOT_ELEMENT: &str = "hazelcast-client";

impl ClientConfig {
    /// Parse a client configuration document. Values the document doesn't
    /// mention keep their defaults.
    pub fn from_xml<S: AsRef<str>>(doc: S) -> Result<Self, ConfigParseError> {
        let doc = Document::parse(doc.as_ref())?;
        let root = doc.root_element();
        if root.tag_name().name() != ROOT_ELEMENT {
            return Err(ConfigParseError::UnexpectedRoot {
                found: root.tag_name().name().to_owned(),
                expected: ROOT_ELEMENT,
            });
        }

        let mut config = ClientConfig::default();
        for node in root.children().filter(Node::is_element) {
            match node.tag_name().name() {
                "group" => {
                    if let Some(name) = child_text(&node, "name") {
                        config.set_cluster_name(name);
                    }
                }
                "cluster-name" => {
                    if let Some(name) = text(&node) {
                        config.set_cluster_name(name);
                    }
                }
                "instance-name" => {
                    if let Some(name) = text(&node) {
                        config.set_instance_name(name);
                    }
                }
                "properties" => parse_properties(&node, &mut config)?,
                "network" => parse_network(&node, config.network_mut())?,
                other => trace!(element = other, "skipping unsupported client config element"),
            }
        }
        debug!(?config, "parsed client config document");

        Ok(config)
    }
}

fn parse_properties(node: &Node<'_, '_>, config: &mut ClientConfig) -> Result<(), ConfigParseError> {
    for (idx, prop) in node
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "property")
        .enumerate()
    {
        let name = prop
            .attribute("name")
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(ConfigParseError::UnnamedProperty(idx))?;
        config.set_property(name, text(&prop).unwrap_or_default());
    }
    Ok(())
}

fn parse_network(node: &Node<'_, '_>, network: &mut NetworkConfig) -> Result<(), ConfigParseError> {
    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "cluster-members" => {
                for addr in child
                    .children()
                    .filter(|n| n.is_element() && n.tag_name().name() == "address")
                    .filter_map(|n| text(&n))
                {
                    network.add_cluster_member(addr);
                }
            }
            "smart-routing" => {
                network.set_smart_routing(parse_value::<bool>(&child, "smart-routing")?);
            }
            "connection-timeout" => {
                let ms = parse_value::<u64>(&child, "connection-timeout")?;
                network.set_connection_timeout(Duration::from_millis(ms));
            }
            "connection-attempt-period" => {
                let ms = parse_value::<u64>(&child, "connection-attempt-period")?;
                network.set_connection_attempt_period(Duration::from_millis(ms));
            }
            "connection-attempt-limit" => {
                network.set_connection_attempt_limit(parse_value::<u32>(
                    &child,
                    "connection-attempt-limit",
                )?);
            }
            other => trace!(element = other, "skipping unsupported network element"),
        }
    }
    Ok(())
}

/// trimmed, non-empty text of an element
fn text(node: &Node<'_, '_>) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn child_text(node: &Node<'_, '_>, name: &str) -> Option<String> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .and_then(|n| text(&n))
}

fn parse_value<T>(node: &Node<'_, '_>, element: &'static str) -> Result<T, ConfigParseError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = text(node).unwrap_or_default();
    raw.parse::<T>()
        .map_err(|err| ConfigParseError::InvalidValue {
            element,
            value: raw.clone(),
            reason: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{DEFAULT_CONNECTION_ATTEMPT_LIMIT, DEFAULT_CONNECTION_TIMEOUT};

    static FULL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<hazelcast-client xmlns="http://www.hazelcast.com/schema/client-config">
    <group>
        <name>legacy</name>
        <password>ignored</password>
    </group>
    <instance-name>cache-client</instance-name>
    <properties>
        <property name="hazelcast.client.heartbeat.timeout">60000</property>
        <property name="hazelcast.logging.type">none</property>
    </properties>
    <network>
        <cluster-members>
            <address>10.0.0.1:5701</address>
            <address> 10.0.0.2:5701 </address>
            <address>10.0.0.3</address>
        </cluster-members>
        <smart-routing>false</smart-routing>
        <connection-timeout>1000</connection-timeout>
        <connection-attempt-period>250</connection-attempt-period>
        <connection-attempt-limit>7</connection-attempt-limit>
        <socket-options><tcp-no-delay>true</tcp-no-delay></socket-options>
    </network>
    <near-cache name="default"/>
</hazelcast-client>"#;

    #[test]
    fn test_parse_full_document() {
        let config = ClientConfig::from_xml(FULL).unwrap();
        assert_eq!(config.cluster_name(), Some("legacy"));
        assert_eq!(config.instance_name(), Some("cache-client"));
        assert_eq!(
            config.property("hazelcast.client.heartbeat.timeout"),
            Some("60000")
        );
        assert_eq!(config.property("hazelcast.logging.type"), Some("none"));

        let network = config.network();
        assert_eq!(network.cluster_members(), &["10.0.0.1:5701", "10.0.0.2:5701", "10.0.0.3:5701"]);
        assert!(!network.smart_routing());
        assert_eq!(network.connection_timeout(), Duration::from_millis(1000));
        assert_eq!(network.connection_attempt_period(), Duration::from_millis(250));
        assert_eq!(network.connection_attempt_limit(), 7);
        assert!(network.discovery().provider().is_none());
    }

    #[test]
    fn test_parse_empty_root_is_default() {
        let config = ClientConfig::from_xml("<hazelcast-client/>").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_partial_network_keeps_defaults() {
        let config = ClientConfig::from_xml(
            "<hazelcast-client><network><smart-routing>true</smart-routing></network></hazelcast-client>",
        )
        .unwrap();
        assert_eq!(
            config.network().connection_attempt_limit(),
            DEFAULT_CONNECTION_ATTEMPT_LIMIT
        );
        assert_eq!(config.network().connection_timeout(), DEFAULT_CONNECTION_TIMEOUT);
    }

    #[test]
    fn test_not_well_formed() {
        let err = ClientConfig::from_xml("<hazelcast-client><group>").unwrap_err();
        assert!(matches!(err, ConfigParseError::Xml(_)));

        let err = ClientConfig::from_xml("not xml at all").unwrap_err();
        assert!(matches!(err, ConfigParseError::Xml(_)));
    }

    #[test]
    fn test_wrong_root() {
        let err = ClientConfig::from_xml("<hazelcast><group/></hazelcast>").unwrap_err();
        match err {
            ConfigParseError::UnexpectedRoot { found, expected } => {
                assert_eq!(found, "hazelcast");
                assert_eq!(expected, ROOT_ELEMENT);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_bad_number() {
        let err = ClientConfig::from_xml(
            "<hazelcast-client><network><connection-attempt-limit>many</connection-attempt-limit></network></hazelcast-client>",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigParseError::InvalidValue {
                element: "connection-attempt-limit",
                ..
            }
        ));
    }

    #[test]
    fn test_bad_bool() {
        let err = ClientConfig::from_xml(
            "<hazelcast-client><network><smart-routing>yes</smart-routing></network></hazelcast-client>",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigParseError::InvalidValue {
                element: "smart-routing",
                ..
            }
        ));
    }

    #[test]
    fn test_unnamed_property() {
        let err = ClientConfig::from_xml(
            r#"<hazelcast-client><properties><property name="a">1</property><property>2</property></properties></hazelcast-client>"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigParseError::UnnamedProperty(1)));
    }
}
