//! Macros for ergonomic state declaration.

/// Generate a state enum and its `State` implementation.
///
/// The enum derives `Copy`, `Eq`, `Hash` and serde traits. An optional
/// `domains` clause groups variants by machine type; ungrouped variants
/// report an empty domain.
///
/// # Example
///
/// ```
/// use statemesh::core::State;
/// use statemesh::state_enum;
///
/// state_enum! {
///     pub enum Street {
///         Green,
///         Yellow,
///         Red,
///         Stopped,
///         Cycling,
///     }
///     domains: {
///         Light: [Green, Yellow, Red],
///         Rider: [Stopped, Cycling],
///     }
/// }
///
/// assert_eq!(Street::Yellow.name(), "Yellow");
/// assert_eq!(Street::Cycling.domain(), "Rider");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(domains: {
            $($domain:ident: [$($member:ident),* $(,)?]),* $(,)?
        })?
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn domain(&self) -> &str {
                match self {
                    $($($(Self::$member => stringify!($domain),)*)*)?
                    #[allow(unreachable_patterns)]
                    _ => "",
                }
            }
        }
    };
}
