use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Up,
    Down,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponseDto {
    /// `ok` when every dependency answered, `degraded` otherwise
    #[schema(example = "ok")]
    pub status: String,
    pub cache: ComponentStatus,
}
