//! Tests for feature combinations and edge cases

#[cfg(feature = "json")]
mod json_tests {
    use async_af::{array, object, wrap, Function, Value};

    #[test]
    fn test_json_serializes_holes_as_null() {
        let value = Value::from(array![1, _, "x", Value::Undefined]);
        let json = serde_json::to_string(&value).ok();
        assert_eq!(json.as_deref(), Some(r#"[1.0,null,"x",null]"#));
    }

    #[test]
    fn test_json_serializes_objects() {
        let value = Value::from(object! { "a" => vec![true], "b" => Value::Null });
        let json = serde_json::to_string(&value).ok();
        assert_eq!(json.as_deref(), Some(r#"{"a":[true],"b":null}"#));
    }

    #[tokio::test]
    async fn test_json_values_feed_a_chain() {
        let parsed: serde_json::Value = serde_json::json!([1, 2, 3]);
        let double = Function::new(|call| Ok(Value::from(call.arg(0).to_number() * 2.0)));
        let out = wrap(Value::from(parsed)).map_af(double).join_af(None).await;
        assert_eq!(out.ok(), Some(Value::from("2,4,6")));
    }

    #[test]
    fn test_json_array_like_object() {
        let parsed = Value::from(serde_json::json!({ "0": "a", "length": 1 }));
        let array = parsed.as_array_like().ok().flatten();
        assert_eq!(array.map(|a| a.len()), Some(1));
    }
}

#[cfg(not(feature = "tokio-async"))]
mod runtime_free_tests {
    use async_af::{wrap, Function, Value};
    use futures::executor::block_on;
    use std::future::IntoFuture;

    #[test]
    fn test_chains_run_on_any_executor() {
        let double = Function::new(|call| Ok(Value::from(call.arg(0).to_number() * 2.0)));
        let out = block_on(wrap(vec![1, 2]).series().map_af(double).into_future());
        assert_eq!(out.ok(), Some(Value::from(vec![2, 4])));
    }
}

mod default_features_tests {
    use async_af::{wrap, Method, Value};
    use futures::executor::block_on;
    use std::future::IntoFuture;

    #[test]
    fn test_chains_do_not_need_a_runtime() {
        let out = block_on(wrap("a-b").split_af(Some("-".into()), None).into_future());
        assert_eq!(out.ok(), Some(Value::from(vec!["a", "b"])));
    }

    #[test]
    fn test_method_names() {
        let names: Vec<&str> = Method::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(names.len(), 14);
        assert!(names.iter().all(|name| name.ends_with("AF")));
    }
}
