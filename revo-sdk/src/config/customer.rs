//! Customer profile used to prefill the gateway and tag submissions.

/// The signed-in customer, as provided by the identity layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerProfile {
    pub email: String,
    pub name: String,
    pub contact: String,
}

impl CustomerProfile {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            contact: contact.into(),
        }
    }
}
