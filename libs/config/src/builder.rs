//! Assembles the client configuration: base selection, then the discovery
//! overlay.

use std::sync::Arc;

use discovery::DiscoveryProvider;
use tracing::{debug, info};

use crate::{ClientConfig, ClientProperties, ConfigParseError, client::property};

/// logging backend the client reports through
pub const LOGGING_TYPE: &str = "tracing";

/// Connection attempts allowed once discovery is wired in. Members registered
/// with discovery may take a while to appear, so this is far above the
/// library default.
pub const CONNECTION_ATTEMPT_LIMIT: u32 = 120;

/// Builds a [`ClientConfig`] from [`ClientProperties`] and a discovery provider.
///
/// Stateless; building twice from the same inputs yields equal configs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigBuilder;

impl ConfigBuilder {
    /// Build the client configuration.
    ///
    /// The base is [`ClientConfig::default`] when no `xml_config` is supplied,
    /// otherwise the parsed document. A document that fails to parse is an
    /// error, never a silent fallback to the defaults. Unless
    /// `skip_default_configuration` is set, the overlay from
    /// [`ConfigBuilder::apply_overlay`] is applied on top of the base.
    pub fn build(
        properties: &ClientProperties,
        discovery: Arc<dyn DiscoveryProvider>,
    ) -> Result<ClientConfig, ConfigParseError> {
        let mut config = match &properties.xml_config {
            None => {
                debug!("no client config document supplied, starting from defaults");
                ClientConfig::default()
            }
            Some(doc) => {
                debug!("starting from supplied client config document");
                ClientConfig::from_xml(doc)?
            }
        };

        if properties.skip_default_configuration {
            info!("skipping default client configuration, discovery overlay not applied");
            return Ok(config);
        }

        Self::apply_overlay(&mut config, &properties.cluster_name, discovery);
        Ok(config)
    }

    /// Overwrite the settings required for discovery-based clustering.
    ///
    /// Every key is set exactly once, so applying the overlay again changes
    /// nothing.
    pub fn apply_overlay(
        config: &mut ClientConfig,
        cluster_name: &str,
        discovery: Arc<dyn DiscoveryProvider>,
    ) {
        config
            .set_property(property::LOGGING_TYPE, LOGGING_TYPE)
            .set_property(property::PHONE_HOME_ENABLED, false.to_string());

        config.set_cluster_name(cluster_name);

        config.set_property(property::DISCOVERY_ENABLED, true.to_string());
        config
            .network_mut()
            .set_connection_attempt_limit(CONNECTION_ATTEMPT_LIMIT)
            .discovery_mut()
            .set_provider(discovery);

        debug!(
            cluster_name,
            connection_attempt_limit = CONNECTION_ATTEMPT_LIMIT,
            "applied discovery overlay"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use discovery::StaticDiscovery;

    use super::*;

    fn provider() -> Arc<dyn DiscoveryProvider> {
        let addr: SocketAddr = "10.1.0.1:5701".parse().unwrap();
        Arc::new(StaticDiscovery::new([addr]))
    }

    fn attached(config: &ClientConfig, provider: &Arc<dyn DiscoveryProvider>) -> bool {
        config
            .network()
            .discovery()
            .provider()
            .map(|p| Arc::ptr_eq(p, provider))
            .unwrap_or(false)
    }

    #[test]
    fn test_defaults_with_overlay() {
        let disco = provider();
        let props = ClientProperties::new("prod-grid");
        let config = ConfigBuilder::build(&props, Arc::clone(&disco)).unwrap();

        assert!(config.is_discovery_enabled());
        assert_eq!(config.cluster_name(), Some("prod-grid"));
        assert_eq!(config.network().connection_attempt_limit(), 120);
        assert!(attached(&config, &disco));
        assert_eq!(config.property(property::LOGGING_TYPE), Some(LOGGING_TYPE));
        assert_eq!(config.property(property::PHONE_HOME_ENABLED), Some("false"));
        assert_eq!(config.property(property::DISCOVERY_ENABLED), Some("true"));
    }

    #[test]
    fn test_overlay_equals_default_plus_overlay() {
        let disco = provider();
        let props = ClientProperties::new("prod-grid");
        let built = ConfigBuilder::build(&props, Arc::clone(&disco)).unwrap();

        let mut expected = ClientConfig::default();
        ConfigBuilder::apply_overlay(&mut expected, "prod-grid", disco);
        assert_eq!(built, expected);
    }

    #[test]
    fn test_skip_defaults() {
        let mut props = ClientProperties::new("prod-grid");
        props.skip_default_configuration = true;
        let config = ConfigBuilder::build(&props, provider()).unwrap();

        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.cluster_name(), None);
        assert!(!config.is_discovery_enabled());
        assert!(config.network().discovery().provider().is_none());
        assert_ne!(
            config.network().connection_attempt_limit(),
            CONNECTION_ATTEMPT_LIMIT
        );
    }

    #[test]
    fn test_document_overridden_by_overlay() {
        let disco = provider();
        let mut props = ClientProperties::new("prod-grid");
        props.xml_config = Some(
            r#"<hazelcast-client>
                <group><name>legacy</name></group>
                <instance-name>cache-client</instance-name>
                <properties>
                    <property name="hazelcast.client.heartbeat.timeout">60000</property>
                    <property name="hazelcast.discovery.enabled">false</property>
                </properties>
                <network>
                    <cluster-members><address>10.0.0.1:5701</address></cluster-members>
                    <connection-attempt-limit>3</connection-attempt-limit>
                    <connection-timeout>1000</connection-timeout>
                </network>
            </hazelcast-client>"#
                .into(),
        );
        let config = ConfigBuilder::build(&props, Arc::clone(&disco)).unwrap();

        // overlay wins
        assert_eq!(config.cluster_name(), Some("prod-grid"));
        assert!(config.is_discovery_enabled());
        assert_eq!(config.network().connection_attempt_limit(), 120);
        assert!(attached(&config, &disco));
        // everything else from the document survives
        assert_eq!(config.instance_name(), Some("cache-client"));
        assert_eq!(
            config.property("hazelcast.client.heartbeat.timeout"),
            Some("60000")
        );
        assert_eq!(config.network().cluster_members(), &["10.0.0.1:5701"]);
        assert_eq!(
            config.network().connection_timeout(),
            std::time::Duration::from_millis(1000)
        );
    }

    #[test]
    fn test_document_with_skip_is_untouched() {
        let doc = r#"<hazelcast-client>
            <group><name>legacy</name></group>
            <network><cluster-members><address>10.0.0.1:5701</address></cluster-members></network>
        </hazelcast-client>"#;
        let props = ClientProperties {
            xml_config: Some(doc.into()),
            skip_default_configuration: true,
            ..ClientProperties::new("prod-grid")
        };
        let config = ConfigBuilder::build(&props, provider()).unwrap();
        assert_eq!(config, ClientConfig::from_xml(doc).unwrap());
        assert_eq!(config.cluster_name(), Some("legacy"));
    }

    #[test]
    fn test_malformed_document_is_error() {
        let mut props = ClientProperties::new("prod-grid");
        props.xml_config = Some("<hazelcast-client><network>".into());
        let err = ConfigBuilder::build(&props, provider()).unwrap_err();
        assert!(matches!(err, ConfigParseError::Xml(_)));

        // skipping the overlay doesn't mask a bad document either
        props.skip_default_configuration = true;
        assert!(ConfigBuilder::build(&props, provider()).is_err());
    }

    #[test]
    fn test_build_is_idempotent() {
        let disco = provider();
        let props = ClientProperties::new("prod-grid");
        let a = ConfigBuilder::build(&props, Arc::clone(&disco)).unwrap();
        let b = ConfigBuilder::build(&props, Arc::clone(&disco)).unwrap();
        assert_eq!(a, b);

        let mut twice = a.clone();
        ConfigBuilder::apply_overlay(&mut twice, "prod-grid", disco);
        assert_eq!(a, twice);
    }
}
