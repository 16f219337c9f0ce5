//! Outbound binding: typed input into a [`RequestEnvelope`].

use std::rc::Rc;
use std::sync::Arc;

use crate::{RequestEnvelope, Result};

/// A value that can be written into an outgoing request.
///
/// `#[derive(Binding)]` implements it for request-shaped structs:
/// path substitutions first, then query pairs, then headers, then the body.
/// The body is the object of the body-tagged fields, or of every field when
/// no field is tagged at all. `None` members and skipped fields are left out.
///
/// Other implementations cover the non-record inputs: `()` sends nothing,
/// `None` leaves the envelope untouched, [`Json`] makes any serializable value
/// the whole body.
pub trait EncodeRequest {
    /// Write `self` into `envelope`.
    ///
    /// # Errors
    ///
    /// Derived implementations only fail when a field's `Serialize`
    /// implementation fails.
    fn encode(&self, envelope: &mut RequestEnvelope) -> Result<()>;
}

impl EncodeRequest for () {
    fn encode(&self, _envelope: &mut RequestEnvelope) -> Result<()> {
        Ok(())
    }
}

impl<T: EncodeRequest> EncodeRequest for Option<T> {
    fn encode(&self, envelope: &mut RequestEnvelope) -> Result<()> {
        match self {
            Some(value) => value.encode(envelope),
            None => Ok(()),
        }
    }
}

impl<T: EncodeRequest + ?Sized> EncodeRequest for &T {
    fn encode(&self, envelope: &mut RequestEnvelope) -> Result<()> {
        (**self).encode(envelope)
    }
}

impl<T: EncodeRequest + ?Sized> EncodeRequest for Box<T> {
    fn encode(&self, envelope: &mut RequestEnvelope) -> Result<()> {
        (**self).encode(envelope)
    }
}

impl<T: EncodeRequest + ?Sized> EncodeRequest for Rc<T> {
    fn encode(&self, envelope: &mut RequestEnvelope) -> Result<()> {
        (**self).encode(envelope)
    }
}

impl<T: EncodeRequest + ?Sized> EncodeRequest for Arc<T> {
    fn encode(&self, envelope: &mut RequestEnvelope) -> Result<()> {
        (**self).encode(envelope)
    }
}

impl EncodeRequest for serde_json::Value {
    fn encode(&self, envelope: &mut RequestEnvelope) -> Result<()> {
        envelope.json(self)?;
        Ok(())
    }
}

/// Sends or receives a value as the whole JSON body, without field routing.
///
/// # Example
///
/// ```
/// use typed_rpc_core::{Body, EncodeRequest, Json, RequestEnvelope};
///
/// let mut envelope = RequestEnvelope::new();
/// Json(vec![1, 2, 3]).encode(&mut envelope).expect("encode");
/// assert_eq!(envelope.body(), Some(&Body::Whole(serde_json::json!([1, 2, 3]))));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Unwrap the inner value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> From<T> for Json<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T: serde::Serialize> EncodeRequest for Json<T> {
    fn encode(&self, envelope: &mut RequestEnvelope) -> Result<()> {
        envelope.json(&self.0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Body;

    struct ItemId(u64);

    impl EncodeRequest for ItemId {
        fn encode(&self, envelope: &mut RequestEnvelope) -> Result<()> {
            envelope.path_param("id", &self.0);
            Ok(())
        }
    }

    #[test]
    fn unit_and_none_leave_envelope_untouched() {
        let mut envelope = RequestEnvelope::new();
        ().encode(&mut envelope).expect("unit");
        None::<ItemId>.encode(&mut envelope).expect("none");
        assert_eq!(envelope, RequestEnvelope::new());
    }

    #[test]
    fn pointers_are_dereferenced() {
        let mut envelope = RequestEnvelope::new();
        Some(Box::new(ItemId(7))).encode(&mut envelope).expect("some");
        assert_eq!(envelope.path_params().get("id").map(String::as_str), Some("7"));

        let mut envelope = RequestEnvelope::new();
        Arc::new(ItemId(8)).encode(&mut envelope).expect("arc");
        assert_eq!(envelope.path_params().get("id").map(String::as_str), Some("8"));
    }

    #[test]
    fn json_is_the_whole_body() {
        let mut envelope = RequestEnvelope::new();
        Json("plain").encode(&mut envelope).expect("json");
        assert_eq!(envelope.body(), Some(&Body::Whole(serde_json::json!("plain"))));
        assert!(envelope.path_params().is_empty());
        assert!(envelope.query_pairs().is_empty());
    }
}
