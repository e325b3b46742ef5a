//! Node edit and enroll workflows over an abstract Ironic client.
//!
//! The client is the only I/O seam; everything here is plain orchestration
//! around [`PatchBuilder`](crate::PatchBuilder) and the submission gate.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use thiserror::Error;

use crate::{
    build_patch, Collection, PatchOperation, PatchOptions, PatchResult, SubmitError, SubmitPolicy,
    Value,
};

const UUID_PATTERN: &str =
    "^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";

/// Provision state verb that moves an enrolled node to `manageable`.
pub const MANAGE_VERB: &str = "manage";

/// Node and port operations offered by the bare-metal API.
pub trait IronicClient {
    /// Transport error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches a node by name or UUID.
    fn get_node(&self, id: &str) -> Result<Value, Self::Error>;

    /// Creates a node and returns the stored document.
    fn create_node(&self, node: &Value) -> Result<Value, Self::Error>;

    /// Applies a patch to a node and returns the stored document.
    fn update_node(&self, id: &str, patch: &[PatchOperation]) -> Result<Value, Self::Error>;

    /// Deletes a node.
    fn delete_node(&self, id: &str) -> Result<(), Self::Error>;

    /// Requests a provision state transition.
    fn set_provision_state(&self, id: &str, verb: &str) -> Result<(), Self::Error>;
}

/// Errors returned by the node workflows.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The client call failed.
    #[error("ironic client error: {0}")]
    Client(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The patch was not clean enough to submit.
    #[error(transparent)]
    Submit(#[from] SubmitError),
    /// A response lacked a field the workflow depends on.
    #[error("response is missing field {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },
}

impl WorkflowError {
    fn client<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Client(Box::new(err))
    }
}

/// Result of [`edit_node`].
#[derive(Clone, Debug, PartialEq)]
pub enum EditOutcome {
    /// Nothing changed; no update was sent.
    Unchanged,
    /// The patch was submitted.
    Updated {
        /// The patch that was sent.
        patch: PatchResult,
        /// The node as stored after the update.
        node: Value,
    },
}

/// Diffs the stored node against `edited` and submits the resulting patch.
///
/// The patch is rooted at `options.base_path()`. With
/// [`SubmitPolicy::RequireOk`] a patch whose status is not OK is refused
/// before the client is called.
pub fn edit_node<C>(
    client: &C,
    id: &str,
    edited: &Value,
    options: &PatchOptions,
    policy: SubmitPolicy,
) -> Result<EditOutcome, WorkflowError>
where
    C: IronicClient,
{
    let current = client.get_node(id).map_err(WorkflowError::client)?;
    let patch = build_patch(&current, edited, options);
    tracing::debug!(
        node = id,
        operations = patch.len(),
        status = %patch.status,
        "built node patch"
    );

    let operations = patch.submittable(policy)?;
    if operations.is_empty() {
        tracing::info!(node = id, "node unchanged; skipping update");
        return Ok(EditOutcome::Unchanged);
    }

    let node = client.update_node(id, operations).map_err(WorkflowError::client)?;
    tracing::info!(node = id, operations = operations.len(), "node updated");
    Ok(EditOutcome::Updated { patch, node })
}

/// A driver property as edited in the enroll form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DriverProperty {
    /// Value typed by the operator, if any.
    pub input_value: Option<String>,
    /// Default advertised by the driver.
    pub default_value: Option<String>,
    /// Whether the property applies under the current selections.
    pub active: bool,
}

impl DriverProperty {
    /// Returns the input value when it should be sent to the API.
    ///
    /// Inactive properties, empty inputs and inputs equal to the default
    /// are left to the driver.
    #[must_use]
    pub fn effective_value(&self) -> Option<&str> {
        let input = self.input_value.as_deref().filter(|v| !v.is_empty())?;
        if !self.active || self.default_value.as_deref() == Some(input) {
            return None;
        }
        Some(input)
    }
}

/// Everything needed to enroll a node.
#[derive(Clone, Debug, Default)]
pub struct EnrollRequest {
    /// Node document without driver properties merged in.
    pub node: Collection,
    /// Driver properties keyed by name, in form order.
    pub driver_properties: IndexMap<String, DriverProperty>,
    /// Whether to request the `manage` transition after creation.
    pub move_to_manageable: bool,
}

/// Writes the effective driver properties into `node.driver_info`.
///
/// ```
/// # use nodepatch_core::{Collection, Value};
/// # use nodepatch_core::ironic::{merge_driver_properties, DriverProperty};
/// let mut node = Collection::mapping();
/// let properties = [(
///     "ipmi_address".to_string(),
///     DriverProperty { input_value: Some("10.0.0.5".into()), default_value: None, active: true },
/// )];
/// merge_driver_properties(&mut node, properties.iter().map(|(k, v)| (k.as_str(), v)));
/// let address = node.get("driver_info").and_then(|info| info.get("ipmi_address"));
/// assert_eq!(address, Some(&Value::from("10.0.0.5")));
/// ```
pub fn merge_driver_properties<'a, I>(node: &mut Collection, properties: I)
where
    I: IntoIterator<Item = (&'a str, &'a DriverProperty)>,
{
    for (name, property) in properties {
        let Some(value) = property.effective_value() else {
            continue;
        };
        tracing::debug!(property = name, "setting driver property");
        if !matches!(node.get("driver_info"), Some(Value::Collection(_))) {
            node.insert("driver_info", Value::Collection(Collection::mapping()));
        }
        if let Some(Value::Collection(info)) = node.get_mut("driver_info") {
            info.insert(name, Value::from(value));
        }
    }
}

/// Creates a node from an enroll request.
///
/// Returns the created node. When `move_to_manageable` is set, the
/// `manage` transition is requested for the new node's `uuid`.
pub fn enroll_node<C>(client: &C, request: EnrollRequest) -> Result<Value, WorkflowError>
where
    C: IronicClient,
{
    let EnrollRequest { mut node, driver_properties, move_to_manageable } = request;
    merge_driver_properties(&mut node, driver_properties.iter().map(|(k, v)| (k.as_str(), v)));

    let created = client.create_node(&Value::Collection(node)).map_err(WorkflowError::client)?;
    tracing::info!("node enrolled");

    if move_to_manageable {
        let uuid =
            created.get("uuid").and_then(Value::as_str).ok_or(WorkflowError::MissingField {
                field: "uuid",
            })?;
        tracing::info!(node = uuid, "setting node provision state");
        client.set_provision_state(uuid, MANAGE_VERB).map_err(WorkflowError::client)?;
    }
    Ok(created)
}

/// Tests whether a string is an OpenStack UUID.
///
/// ```
/// # use nodepatch_core::ironic::is_uuid;
/// assert!(is_uuid("1be26c0b-03f2-4d2e-ae87-c02d7f33c123"));
/// assert!(!is_uuid("node-1"));
/// ```
#[must_use]
pub fn is_uuid(candidate: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(UUID_PATTERN).expect("valid uuid pattern"));
    pattern.is_match(candidate)
}

/// Returns `port.extra.vif_port_id`, or `""` when the port has none.
///
/// ```
/// # use nodepatch_core::{ironic::vif_port_id, Value};
/// let port = Value::from_json_str("{\"extra\":{\"vif_port_id\":\"abc\"}}")?;
/// assert_eq!(vif_port_id(&port), "abc");
/// assert_eq!(vif_port_id(&Value::from_json_str("{}")?), "");
/// # Ok::<(), nodepatch_core::ParseError>(())
/// ```
#[must_use]
pub fn vif_port_id(port: &Value) -> &str {
    port.get("extra")
        .and_then(|extra| extra.get("vif_port_id"))
        .and_then(Value::as_str)
        .unwrap_or("")
}
