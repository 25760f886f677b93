/// Builds a [`Bag`](crate::Bag) from `path => value` pairs.
///
/// Paths are dotted and auto-create intermediate Bags, exactly like
/// [`Bag::set`](crate::Bag::set). A pair may carry attributes after a `;`.
/// The macro evaluates to `Result<Bag>` because a later path may conflict
/// with an earlier scalar; `?` may be used inside values, which makes
/// nesting straightforward.
///
/// # Examples
///
/// ```rust
/// use tytx_bag::{bag, Value};
///
/// let bag = bag! {
///     "config.host" => "localhost",
///     "config.port" => 8080; { "unit" => "tcp" },
///     "limits" => bag! { "max" => 10 }?,
/// }
/// .unwrap();
///
/// assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["config", "limits"]);
/// assert_eq!(bag.get("limits.max"), Some(&Value::Integer(10)));
/// assert_eq!(
///     bag.get_node("config.port").unwrap().get_attr("unit"),
///     Some(&Value::from("tcp"))
/// );
///
/// assert!(bag! { "a" => 1, "a.b" => 2 }.is_err());
/// ```
#[macro_export]
macro_rules! bag {
    (@set $bag:ident, $path:literal, $value:expr) => {
        $bag.set($path, $value)?;
    };

    (@set $bag:ident, $path:literal, $value:expr, [$(($key:literal, $attr:expr)),+]) => {
        $bag.set_with_attrs(
            $path,
            $value,
            $crate::AttrMap::from_pairs([$(($key, $crate::Value::from($attr))),+])?,
        )?;
    };

    () => {
        ::core::result::Result::<$crate::Bag, $crate::Error>::Ok($crate::Bag::new())
    };

    ($($path:literal => $value:expr $(; { $($key:literal => $attr:expr),+ $(,)? })?),+ $(,)?) => {
        (|| -> $crate::Result<$crate::Bag> {
            let mut bag = $crate::Bag::new();
            $(
                $crate::bag!(@set bag, $path, $value $(, [$(($key, $attr)),+])?);
            )+
            ::core::result::Result::Ok(bag)
        })()
    };
}
