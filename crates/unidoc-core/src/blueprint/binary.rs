//! Binary serialization for blueprints using postcard.

use super::types::Blueprint;
use super::validate::BlueprintError;

impl Blueprint {
    /// Deserialize and validate a blueprint from binary format.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, BlueprintError> {
        let blueprint: Blueprint = postcard::from_bytes(bytes).map_err(BlueprintError::Binary)?;
        blueprint.validate()?;
        Ok(blueprint)
    }

    /// Serialize the blueprint to binary format.
    pub fn to_binary(&self) -> Result<Vec<u8>, BlueprintError> {
        postcard::to_allocvec(self).map_err(BlueprintError::Binary)
    }
}
