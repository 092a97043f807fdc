//! Tests for macros features

#[cfg(feature = "macros")]
mod macros_tests {
    use async_af::{array, object, Array, Object, Value};

    #[test]
    fn test_macros_array_dense() {
        let a = array![1, "two", true];
        assert_eq!(a.len(), 3);
        assert_eq!(a.get(0), Some(&Value::from(1)));
        assert_eq!(a.get(1), Some(&Value::from("two")));
        assert_eq!(a.get(2), Some(&Value::Bool(true)));

        let empty = array![];
        assert_eq!(empty, Array::new());
    }

    #[test]
    fn test_macros_array_holes() {
        let a = array![_, 1, _, _];
        assert_eq!(a.len(), 4);
        assert_eq!(a.present_count(), 1);
        assert!(a.is_hole(0) && a.is_hole(2) && a.is_hole(3));

        let holes_only = array![_, _];
        assert_eq!(holes_only, Array::holes(2));
    }

    #[test]
    fn test_macros_array_trailing_comma_and_nesting() {
        let a = array![array![1, _], vec![2, 3],];
        assert_eq!(a.len(), 2);
        assert_eq!(a.get(0), Some(&Value::from(array![1, _])));
        assert_eq!(a.get(1).map(ToString::to_string).as_deref(), Some("2,3"));
    }

    #[test]
    fn test_macros_object() {
        let o = object! { "name" => "af", "size" => 2, };
        assert_eq!(o.len(), 2);
        assert_eq!(o.get("name"), Some(&Value::from("af")));
        assert!(o.length().is_none());

        let empty = object! {};
        assert_eq!(empty, Object::new());
    }
}
