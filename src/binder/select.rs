use crate::error::Result;
use crate::state::{GlobalState, KeySet};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Props a bound component can derive from the state.
///
/// `keys` names what the props read; the binder subscribes to exactly those
/// keys and compares successive selections with `PartialEq` to decide
/// whether to render again.
///
/// # Examples
///
/// ```
/// use serde::Deserialize;
/// use unibind::binder::{select_typed, Selectable};
/// use unibind::{GlobalState, KeySet, Result};
///
/// #[derive(Deserialize, PartialEq)]
/// struct Counter {
///     count: i64,
/// }
///
/// impl Selectable for Counter {
///     fn keys() -> KeySet {
///         ["count"].into_iter().collect()
///     }
///
///     fn select(state: &GlobalState) -> Result<Self> {
///         select_typed(state, &Self::keys())
///     }
/// }
/// ```
pub trait Selectable: Sized + PartialEq + 'static {
    fn keys() -> KeySet;

    fn select(state: &GlobalState) -> Result<Self>;
}

/// Deserialize the entries named by `keys` into `T`.
pub fn select_typed<T: DeserializeOwned>(state: &GlobalState, keys: &KeySet) -> Result<T> {
    let slice = state.slice(keys);
    Ok(serde_json::from_value(Value::Object(slice.as_map().clone()))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Counter {
        count: i64,
    }

    #[test]
    fn selects_only_named_keys() {
        let state = GlobalState::try_from(json!({ "count": 4, "noise": [1, 2] })).unwrap();
        let keys: KeySet = ["count"].into_iter().collect();

        let counter: Counter = select_typed(&state, &keys).unwrap();
        assert_eq!(counter, Counter { count: 4 });
    }

    #[test]
    fn shape_mismatch_is_select_error() {
        let state = GlobalState::try_from(json!({ "count": "four" })).unwrap();
        let keys: KeySet = ["count"].into_iter().collect();

        let err = select_typed::<Counter>(&state, &keys).unwrap_err();
        assert!(matches!(err, Error::Select(_)));
    }
}
