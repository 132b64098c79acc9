//! # Operator Registry
//!
//! Every operator category (selection, crossover, mutation, replacement) owns
//! a `Registry`: a fixed table of named built-in operators plus one slot for a
//! user-supplied closure. Looking up a name yields an [`OperatorChoice`],
//! which is either a built-in kind or the user's closure.
//!
//! Built-in names may be abbreviated to any unambiguous prefix. The user slot
//! only answers to its exact name.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use genpool::registry::{OperatorChoice, Registry};
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! enum Kind { Alpha, Beta }
//!
//! type Op = dyn Fn(u32) -> u32 + Send + Sync;
//!
//! let mut registry: Registry<Kind, Op> =
//!     Registry::new("demo", &[("alpha", Kind::Alpha), ("beta", Kind::Beta)]);
//!
//! assert!(matches!(registry.select("al").unwrap(), OperatorChoice::Builtin(Kind::Alpha)));
//!
//! registry.set_user_function("double", Arc::new(|x: u32| x * 2));
//! let choice = registry.select("double").unwrap();
//! assert_eq!(registry.name_of(&choice), "double");
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::{GeneticError, Result};

/// Display name of an installed user function that was given no name.
pub const UNSPECIFIED: &str = "Unspecified";
/// Display name of an operator the registry does not know.
pub const UNKNOWN: &str = "Unknown";

/// A resolved operator: one of the built-in kinds or a user closure.
pub enum OperatorChoice<K, F: ?Sized> {
    Builtin(K),
    Custom(Arc<F>),
}

impl<K: Copy, F: ?Sized> Clone for OperatorChoice<K, F> {
    fn clone(&self) -> Self {
        match self {
            OperatorChoice::Builtin(k) => OperatorChoice::Builtin(*k),
            OperatorChoice::Custom(f) => OperatorChoice::Custom(Arc::clone(f)),
        }
    }
}

impl<K: fmt::Debug, F: ?Sized> fmt::Debug for OperatorChoice<K, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorChoice::Builtin(k) => f.debug_tuple("Builtin").field(k).finish(),
            OperatorChoice::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

struct UserOperator<F: ?Sized> {
    name: Option<String>,
    func: Arc<F>,
}

/// Name lookup for one operator category.
pub struct Registry<K: 'static, F: ?Sized> {
    category: &'static str,
    builtins: &'static [(&'static str, K)],
    user: Option<UserOperator<F>>,
}

impl<K, F> Registry<K, F>
where
    K: Copy + PartialEq + 'static,
    F: ?Sized,
{
    pub fn new(category: &'static str, builtins: &'static [(&'static str, K)]) -> Self {
        Self {
            category,
            builtins,
            user: None,
        }
    }

    pub fn category(&self) -> &'static str {
        self.category
    }

    /// Names of the built-in operators, in table order.
    pub fn builtin_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.builtins.iter().map(|(name, _)| *name)
    }

    /// Installs `func` in the user slot, replacing any previous one, and
    /// returns it as a choice. An empty `name` leaves the function unnamed.
    pub fn set_user_function(&mut self, name: &str, func: Arc<F>) -> OperatorChoice<K, F> {
        let name = (!name.is_empty()).then(|| name.to_string());
        self.user = Some(UserOperator {
            name,
            func: Arc::clone(&func),
        });
        OperatorChoice::Custom(func)
    }

    /// Resolves `name` against the user slot, then the built-ins.
    ///
    /// An exact built-in name always wins. Otherwise `name` must be a prefix
    /// of exactly one built-in.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::UnknownOperator` if nothing matches and
    /// `GeneticError::Configuration` if the prefix is ambiguous.
    pub fn select(&self, name: &str) -> Result<OperatorChoice<K, F>> {
        if let Some(user) = &self.user {
            if user.name.as_deref() == Some(name) {
                return Ok(OperatorChoice::Custom(Arc::clone(&user.func)));
            }
        }

        if let Some((_, kind)) = self.builtins.iter().find(|(n, _)| *n == name) {
            return Ok(OperatorChoice::Builtin(*kind));
        }

        if !name.is_empty() {
            let mut matches = self.builtins.iter().filter(|(n, _)| n.starts_with(name));
            if let Some((first, kind)) = matches.next() {
                if let Some((second, _)) = matches.next() {
                    return Err(GeneticError::Configuration(format!(
                        "Ambiguous {} operator {:?}: matches {} and {}",
                        self.category, name, first, second
                    )));
                }
                return Ok(OperatorChoice::Builtin(*kind));
            }
        }

        Err(GeneticError::UnknownOperator {
            category: self.category,
            name: name.to_string(),
        })
    }

    /// Display name of `choice`.
    ///
    /// Yields [`UNSPECIFIED`] for the installed user function when it has no
    /// name, and [`UNKNOWN`] for anything the registry does not hold.
    pub fn name_of(&self, choice: &OperatorChoice<K, F>) -> &str {
        match choice {
            OperatorChoice::Builtin(kind) => self
                .builtins
                .iter()
                .find(|(_, k)| k == kind)
                .map(|(n, _)| *n)
                .unwrap_or(UNKNOWN),
            OperatorChoice::Custom(func) => match &self.user {
                Some(user) if same_function(&user.func, func) => {
                    user.name.as_deref().unwrap_or(UNSPECIFIED)
                }
                _ => UNKNOWN,
            },
        }
    }
}

fn same_function<F: ?Sized>(a: &Arc<F>, b: &Arc<F>) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

impl<K: 'static, F: ?Sized> Clone for Registry<K, F> {
    fn clone(&self) -> Self {
        Self {
            category: self.category,
            builtins: self.builtins,
            user: self.user.as_ref().map(|u| UserOperator {
                name: u.name.clone(),
                func: Arc::clone(&u.func),
            }),
        }
    }
}

impl<K: 'static, F: ?Sized> fmt::Debug for Registry<K, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("category", &self.category)
            .field("builtins", &self.builtins.iter().map(|(n, _)| *n).collect::<Vec<_>>())
            .field("user", &self.user.as_ref().map(|u| u.name.as_deref().unwrap_or(UNSPECIFIED)))
            .finish()
    }
}
