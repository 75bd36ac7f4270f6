use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Success body shared by the JSON endpoints: `{"message": ..., "data": ...}`.
#[derive(Serialize, Debug)]
pub struct Envelope<T> {
    pub message: &'static str,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self { message: "success", data }
    }
}
