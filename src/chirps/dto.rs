use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ChirpRequest {
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct ValidatedChirp {
    pub cleaned_body: String,
}
