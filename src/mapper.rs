//! # Response Mapper
//!
//! Pure conversions from OCI wire responses to tool output records.
//! No field is defaulted: whatever is absent on the wire stays absent.

use crate::models::{SecretMetadata, SecretValue, SecretVersion};
use crate::provider::oci::responses::{
    SecretBundle, SecretBundleVersionSummary, SecretDetails, SecretSummary,
};

pub fn secret_metadata_from_summary(summary: SecretSummary) -> SecretMetadata {
    SecretMetadata {
        id: summary.id,
        lifecycle_state: summary.lifecycle_state,
        vault_id: summary.vault_id,
        compartment_id: summary.compartment_id,
        name: summary.secret_name,
        description: summary.description,
        secret_version_count: None,
        current_version_number: None,
        time_created: summary.time_created,
        time_of_current_version: summary.time_of_current_version,
        time_of_deletion: summary.time_of_deletion,
        rotation_config: summary.rotation_config,
        freeform_tags: summary.freeform_tags,
        defined_tags: summary.defined_tags,
    }
}

pub fn secret_metadata_from_details(details: SecretDetails) -> SecretMetadata {
    SecretMetadata {
        id: details.id,
        lifecycle_state: details.lifecycle_state,
        vault_id: details.vault_id,
        compartment_id: details.compartment_id,
        name: details.secret_name,
        description: details.description,
        secret_version_count: None,
        current_version_number: details.current_version_number,
        time_created: details.time_created,
        time_of_current_version: details.time_of_current_version,
        time_of_deletion: details.time_of_deletion,
        rotation_config: details.rotation_config,
        freeform_tags: details.freeform_tags,
        defined_tags: details.defined_tags,
    }
}

pub fn secret_version(summary: SecretBundleVersionSummary) -> SecretVersion {
    SecretVersion {
        version_number: summary.version_number,
        time_created: summary.time_created,
        time_of_deletion: summary.time_of_deletion,
        lifecycle_state: summary.lifecycle_state,
        stages: summary.stages,
    }
}

/// Bundle metadata only; the wire struct never holds the content itself
pub fn secret_value(bundle: SecretBundle) -> SecretValue {
    let (content_type, has_content) = bundle
        .secret_bundle_content
        .map_or((None, false), |content| {
            (content.content_type, content.has_content)
        });

    SecretValue {
        secret_id: bundle.secret_id,
        version_number: bundle.version_number,
        version_name: bundle.version_name,
        stages: bundle.stages,
        time_created: bundle.time_created,
        content_type,
        has_content,
    }
}
