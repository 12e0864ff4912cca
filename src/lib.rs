mod core;

#[cfg(test)]
mod tests;

pub use crate::core::domain::config::{ClientConfig, RateLimitConfig};
pub use crate::core::domain::error::{BmcError, BmcResult, ValidationError};
pub use crate::core::domain::model::about::About;
pub use crate::core::domain::model::bmc_connection::{BmcConnection, Protocol};
pub use crate::core::domain::model::info::Info;
pub use crate::core::domain::model::interface_details::InterfaceDetails;
pub use crate::core::domain::model::node::Node;
pub use crate::core::domain::model::other::Other;
pub use crate::core::domain::model::storage_details::StorageDetails;
pub use crate::core::domain::model::usb_mode::{UsbConfig, UsbMode, UsbModeKind, UsbRoute};
pub use crate::core::domain::value_object::{BmcHost, BmcPassword, BmcUrl, BmcUsername};

use crate::core::domain::cache::Cached;
use crate::core::domain::command::{wire_index_to_slot, Command};
use crate::core::infrastructure::envelope;
use crate::core::infrastructure::firmware_feed;
use crate::core::infrastructure::session::Session;
use std::time::Duration;
use tracing::warn;

/// A client for the management API of one Turing Pi 2 cluster.
///
/// The facade owns the HTTP session and a cache per queryable field.
/// Read accessors are lazy: the first call fetches and caches, later
/// calls return the cache without touching the network. Nothing is
/// invalidated automatically; call the matching `refresh_*` method (or
/// [`Cluster::fetch_power`]) to observe server-side changes. Mutating
/// commands return a `bool` and, on confirmed success, update the
/// cached node state to match the command just issued.
///
/// # Examples
///
/// ```no_run
/// use turingpi_bmc::{Cluster, BmcResult};
///
/// #[tokio::main]
/// async fn main() -> BmcResult<()> {
///     let mut cluster = Cluster::builder()
///         .host("192.168.1.91")
///         .credentials("root", "turing")
///         .accept_invalid_certs(true)
///         .build()?;
///
///     for node in cluster.nodes().await? {
///         println!("{}: powered {}", node, node.powered_on());
///     }
///     Ok(())
/// }
/// ```
pub struct Cluster {
    session: Session,
    feed_url: String,
    about: Cached<About>,
    info: Cached<Info>,
    other: Cached<Other>,
    latest_version: Cached<String>,
    nodes: Cached<Vec<Node>>,
}

/// Builder for [`Cluster`] configuration.
#[derive(Debug, Default)]
pub struct ClusterBuilder {
    host: Option<String>,
    username: Option<String>,
    password: Option<String>,
    protocol: Protocol,
    accept_invalid_certs: bool,
    timeout: Option<Duration>,
    rate_limit: Option<RateLimitConfig>,
    feed_url: Option<String>,
}

impl ClusterBuilder {
    /// Sets the board's IPv4 address or hostname. Required.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the basic-auth credentials. Required for
    /// [`Protocol::Current`]; ignored by [`Protocol::Legacy`].
    pub fn credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Selects the wire protocol flavor. Defaults to
    /// [`Protocol::Current`].
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Skips TLS certificate verification. The stock firmware serves a
    /// self-signed certificate, so most deployments need this.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Sets a per-request timeout, passed through to the HTTP client.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enables client-side rate limiting.
    pub fn rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    /// Overrides the firmware release feed URL consulted by
    /// [`Cluster::latest_version`].
    pub fn firmware_feed_url(mut self, url: impl Into<String>) -> Self {
        self.feed_url = Some(url.into());
        self
    }

    /// Validates the configuration and builds the client.
    pub fn build(self) -> BmcResult<Cluster> {
        let host = BmcHost::new(self.host.ok_or_else(|| ValidationError::Field {
            field: "host".to_string(),
            message: "Host is required".to_string(),
        })?)?;
        let username = self.username.map(BmcUsername::new).transpose()?;
        let password = self.password.map(BmcPassword::new).transpose()?;

        let connection = BmcConnection::new(
            host,
            username,
            password,
            self.protocol,
            self.accept_invalid_certs,
        )?;
        let config = ClientConfig {
            timeout: self.timeout,
            rate_limit: self.rate_limit,
        };
        let session = Session::new(connection, &config)?;

        Ok(Cluster {
            session,
            feed_url: self
                .feed_url
                .unwrap_or_else(|| firmware_feed::RELEASE_FEED_URL.to_string()),
            about: Cached::default(),
            info: Cached::default(),
            other: Cached::default(),
            latest_version: Cached::default(),
            nodes: Cached::default(),
        })
    }
}

impl Cluster {
    /// Creates a new builder for [`Cluster`] configuration.
    pub fn builder() -> ClusterBuilder {
        ClusterBuilder::default()
    }

    #[cfg(test)]
    pub(crate) fn with_session(session: Session, feed_url: impl Into<String>) -> Self {
        Self {
            session,
            feed_url: feed_url.into(),
            about: Cached::default(),
            info: Cached::default(),
            other: Cached::default(),
            latest_version: Cached::default(),
            nodes: Cached::default(),
        }
    }

    /// Returns the connection parameters this client was built with.
    pub fn connection(&self) -> &BmcConnection {
        self.session.connection()
    }

    // ---- read accessors -------------------------------------------------

    /// Installed firmware identity. Cached after the first call.
    pub async fn about(&mut self) -> BmcResult<About> {
        if let Some(about) = self.about.get() {
            return Ok(about.clone());
        }
        self.refresh_about().await
    }

    /// Re-fetches the `about` data, replacing the cache.
    pub async fn refresh_about(&mut self) -> BmcResult<About> {
        self.about.clear();
        let payload = self.session.execute(&Command::GetAbout).await?;
        let about = About::from_payload(&payload)?;
        Ok(self.about.set(about).clone())
    }

    /// Network interfaces and storage devices. Cached after the first
    /// call.
    pub async fn info(&mut self) -> BmcResult<Info> {
        if let Some(info) = self.info.get() {
            return Ok(info.clone());
        }
        self.refresh_info().await
    }

    /// Re-fetches the `info` data, replacing the cache.
    pub async fn refresh_info(&mut self) -> BmcResult<Info> {
        self.info.clear();
        let payload = self.session.execute(&Command::GetInfo).await?;
        let info = Info::from_payload(&payload)?;
        Ok(self.info.set(info).clone())
    }

    /// Secondary board identity. Cached after the first call.
    pub async fn other(&mut self) -> BmcResult<Other> {
        if let Some(other) = self.other.get() {
            return Ok(other.clone());
        }
        self.refresh_other().await
    }

    /// Re-fetches the `other` data, replacing the cache.
    pub async fn refresh_other(&mut self) -> BmcResult<Other> {
        self.other.clear();
        let payload = self.session.execute(&Command::GetOther).await?;
        let other = Other::from_payload(&payload)?;
        Ok(self.other.set(other).clone())
    }

    /// The cluster's nodes with their last observed power state.
    /// Fetches on first access; afterwards returns the cache, which can
    /// go stale relative to the hardware. Use [`Cluster::fetch_power`]
    /// to refresh.
    pub async fn nodes(&mut self) -> BmcResult<&[Node]> {
        if !self.nodes.is_fetched() {
            self.fetch_power().await?;
        }
        Ok(self.nodes.get().map(Vec::as_slice).unwrap_or_default())
    }

    /// Fetches the power state of every node, updating cached nodes in
    /// place and creating any that have not been seen yet.
    pub async fn fetch_power(&mut self) -> BmcResult<&[Node]> {
        let payload = self.session.execute(&Command::GetPower).await?;
        let map = payload
            .as_object()
            .ok_or_else(|| BmcError::Protocol("power payload is not an object".to_string()))?;

        let mut nodes = self.nodes.get().cloned().unwrap_or_default();
        for (index, (name, state)) in map.iter().enumerate() {
            let slot = wire_index_to_slot(index);
            let powered_on = state.as_str() == Some("1");
            match nodes.iter_mut().find(|node| node.slot() == slot) {
                Some(node) => {
                    node.set_name(name.clone());
                    node.set_powered_on(powered_on);
                }
                None => {
                    let mut node = Node::new(slot, name.clone(), "");
                    node.set_powered_on(powered_on);
                    nodes.push(node);
                }
            }
        }
        nodes.sort_by_key(Node::slot);

        Ok(self.nodes.set(nodes).as_slice())
    }

    /// The current USB multiplexer routing. Queried fresh on every
    /// call; triggers a power fetch first when nodes are not yet
    /// cached.
    pub async fn usb_mode(&mut self) -> BmcResult<UsbMode> {
        if !self.nodes.is_fetched() {
            self.fetch_power().await?;
        }
        let payload = self.session.execute(&Command::GetUsb).await?;
        let nodes = self.nodes.get().map(Vec::as_slice).unwrap_or_default();
        UsbMode::from_payload(&payload, nodes)
    }

    /// Like [`Cluster::usb_mode`], but swallows transport/protocol
    /// failures of the USB query itself and returns the first node in
    /// host mode on the BMC bus instead. The prerequisite power fetch
    /// still propagates its errors.
    pub async fn usb_mode_or_default(&mut self) -> BmcResult<UsbMode> {
        if !self.nodes.is_fetched() {
            self.fetch_power().await?;
        }
        let first = self
            .nodes
            .get()
            .and_then(|nodes| nodes.first())
            .cloned()
            .ok_or_else(|| {
                ValidationError::ConstraintViolation("cluster reported no nodes".to_string())
            })?;

        match self.session.execute(&Command::GetUsb).await {
            Ok(payload) => {
                let nodes = self.nodes.get().map(Vec::as_slice).unwrap_or_default();
                UsbMode::from_payload(&payload, nodes)
            }
            Err(BmcError::Transport(e)) | Err(BmcError::Protocol(e)) => {
                warn!(error = %e, "usb mode query failed, returning the default routing");
                Ok(UsbMode::new(first, UsbModeKind::Host, UsbRoute::Bmc))
            }
            Err(e) => Err(e),
        }
    }

    /// SD card usage. Queried fresh on every call.
    pub async fn sdcard(&mut self) -> BmcResult<StorageDetails> {
        let payload = self.session.execute(&Command::GetStorage).await?;
        StorageDetails::from_sdcard_payload(&payload)
    }

    /// Like [`Cluster::sdcard`], but swallows transport/protocol
    /// failures and returns a zero-valued placeholder instead. A
    /// payload that arrives but fails validation still propagates.
    pub async fn sdcard_or_default(&mut self) -> BmcResult<StorageDetails> {
        match self.session.execute(&Command::GetStorage).await {
            Ok(payload) => StorageDetails::from_sdcard_payload(&payload),
            Err(BmcError::Transport(e)) | Err(BmcError::Protocol(e)) => {
                warn!(error = %e, "sdcard query failed, returning zeroed placeholder");
                Ok(StorageDetails::zeroed("SD Card"))
            }
            Err(e) => Err(e),
        }
    }

    /// The latest published firmware version, taken from the release
    /// feed's first entry with its tag prefix stripped. Cached after
    /// the first call.
    pub async fn latest_version(&mut self) -> BmcResult<String> {
        if let Some(version) = self.latest_version.get() {
            return Ok(version.clone());
        }
        self.refresh_latest_version().await
    }

    /// Re-fetches the release feed, replacing the cached version.
    pub async fn refresh_latest_version(&mut self) -> BmcResult<String> {
        self.latest_version.clear();
        let body = self.session.fetch_text(&self.feed_url).await?;
        let title = firmware_feed::first_entry_title(&body)?;
        let version = firmware_feed::strip_tag_prefix(&title).to_string();
        Ok(self.latest_version.set(version).clone())
    }

    /// Whether the published firmware is newer than the installed one.
    /// Equal versions are not an update. A version string that does not
    /// parse as semver is a validation error, never "no update".
    pub async fn update_available(&mut self) -> BmcResult<bool> {
        let installed = self.about().await?.version().to_string();
        let latest = self.latest_version().await?;

        let installed = semver::Version::parse(&installed).map_err(|e| {
            ValidationError::Format(format!(
                "installed version '{}' is not a semantic version: {}",
                installed, e
            ))
        })?;
        let latest = semver::Version::parse(&latest).map_err(|e| {
            ValidationError::Format(format!(
                "latest version '{}' is not a semantic version: {}",
                latest, e
            ))
        })?;

        Ok(installed < latest)
    }

    // ---- mutating commands ----------------------------------------------

    /// Powers on the given nodes (1-based slots). On confirmed success
    /// the cached `powered_on` flags are set accordingly.
    pub async fn start_nodes(&mut self, slots: &[usize]) -> bool {
        self.set_power(slots, true).await
    }

    /// Powers off the given nodes (1-based slots).
    pub async fn stop_nodes(&mut self, slots: &[usize]) -> bool {
        self.set_power(slots, false).await
    }

    /// Powers on a single node.
    pub async fn start_node(&mut self, slot: usize) -> bool {
        self.set_power(&[slot], true).await
    }

    /// Powers off a single node.
    pub async fn stop_node(&mut self, slot: usize) -> bool {
        self.set_power(&[slot], false).await
    }

    async fn set_power(&mut self, slots: &[usize], on: bool) -> bool {
        if !self.nodes.is_fetched() && self.fetch_power().await.is_err() {
            warn!("power command aborted: node list could not be fetched");
            return false;
        }
        let Some(nodes) = self.nodes.get() else {
            return false;
        };

        let mut levels = Vec::with_capacity(slots.len());
        for slot in slots {
            match nodes.iter().find(|node| node.slot() == *slot) {
                Some(node) => levels.push((node.name().to_string(), on)),
                None => {
                    warn!(slot = *slot, "power command aborted: unknown node slot");
                    return false;
                }
            }
        }

        if !self.run_ok_command(Command::SetPower { levels }).await {
            return false;
        }

        if let Some(nodes) = self.nodes.get_mut() {
            for slot in slots {
                if let Some(node) = nodes.iter_mut().find(|node| node.slot() == *slot) {
                    node.set_powered_on(on);
                }
            }
        }
        true
    }

    /// Resets (restarts) a node. A confirmed reset leaves the node
    /// running, so the cached `powered_on` flag is set on success.
    pub async fn restart_node(&mut self, slot: usize) -> bool {
        if slot == 0 {
            warn!("node slots are 1-based");
            return false;
        }
        if !self.run_ok_command(Command::ResetNode { slot }).await {
            return false;
        }
        if let Some(nodes) = self.nodes.get_mut() {
            if let Some(node) = nodes.iter_mut().find(|node| node.slot() == slot) {
                node.set_powered_on(true);
            }
        }
        true
    }

    /// Routes a node's USB port per the given configuration.
    pub async fn set_usb_mode(&mut self, slot: usize, config: UsbConfig) -> bool {
        if slot == 0 {
            warn!("node slots are 1-based");
            return false;
        }
        self.run_ok_command(Command::SetUsb { slot, config }).await
    }

    /// Clears a node's USB-boot flag.
    pub async fn clear_usb_boot(&mut self, slot: usize) -> bool {
        if slot == 0 {
            warn!("node slots are 1-based");
            return false;
        }
        self.run_ok_command(Command::ClearUsbBoot { slot }).await
    }

    /// Triggers a USB boot on a node.
    pub async fn usb_boot(&mut self, slot: usize) -> bool {
        if slot == 0 {
            warn!("node slots are 1-based");
            return false;
        }
        self.run_ok_command(Command::UsbBoot { slot }).await
    }

    /// Exposes a node's storage as a mass-storage device.
    pub async fn node_to_msd(&mut self, slot: usize) -> bool {
        if slot == 0 {
            warn!("node slots are 1-based");
            return false;
        }
        self.run_ok_command(Command::NodeToMsd { slot }).await
    }

    /// Resets the board's network stack.
    pub async fn network_reset(&mut self) -> bool {
        self.run_ok_command(Command::NetworkReset).await
    }

    /// Reloads the board's management daemon.
    pub async fn reload(&mut self) -> bool {
        self.run_ok_command(Command::Reload).await
    }

    /// Reboots the board itself (not the nodes).
    pub async fn reboot(&mut self) -> bool {
        self.run_ok_command(Command::Reboot).await
    }

    /// Issues a set command and reduces the outcome to a success flag.
    /// Transport failures and server rejections both come back `false`;
    /// the distinction is only visible in the warning log.
    async fn run_ok_command(&mut self, command: Command) -> bool {
        match self.session.execute(&command).await {
            Ok(payload) => envelope::is_ok(&payload),
            Err(e) => {
                warn!(error = %e, "BMC command failed");
                false
            }
        }
    }
}
