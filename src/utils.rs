use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SuccessBody {
    pub success: bool,
}

impl SuccessBody {
    pub fn new() -> SuccessBody {
        SuccessBody { success: true }
    }
}
