use serde::{Deserialize, Serialize};

pub mod verify_password {
    use super::*;

    #[derive(Serialize, Deserialize)]
    pub struct RequestBody {
        #[serde(default)]
        pub password: Option<String>,
    }

    #[derive(Deserialize, Serialize, Debug)]
    pub struct APIResponse {
        pub success: bool,
    }
}
