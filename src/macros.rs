/// Construct a BSON value.
///
/// Nested array and document literals are converted recursively; any other
/// expression goes through [`Bson::from`](crate::Bson).
///
/// ```
/// use bsonlite::bson;
///
/// let value = bson!({
///     "code" => 200,
///     "success" => true,
///     "payload" => ["a", "b"]
/// });
/// ```
#[macro_export]
macro_rules! bson {
    ([]) => {{ $crate::Bson::Array(::std::vec::Vec::new()) }};

    ([$($val:tt),* $(,)?]) => {{
        let mut array = ::std::vec::Vec::new();

        $(
            array.push($crate::bson!($val));
        )*

        $crate::Bson::Array(array)
    }};

    ({ $($k:expr => $v:tt),* $(,)? }) => {{
        $crate::Bson::Document($crate::doc! {
            $(
                $k => $v
            ),*
        })
    }};

    ($val:expr) => {{
        $crate::Bson::from($val)
    }};
}

/// Construct a BSON [`Document`](crate::Document).
///
/// ```
/// use bsonlite::doc;
///
/// let doc = doc! {
///     "name" => "example",
///     "pos" => { "x" => 1, "y" => 2 },
/// };
/// assert_eq!(doc.get_document("pos").unwrap().get_i32("y"), Ok(2));
/// ```
#[macro_export]
macro_rules! doc {
    () => {{ $crate::Document::new() }};

    ( $($key:expr => $val:tt),* $(,)? ) => {{
        let mut document = $crate::Document::new();

        $(
            document.insert($key, $crate::bson!($val));
        )*

        document
    }};
}
