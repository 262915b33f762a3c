use cached::{Cached, SizedCache, UnboundCache};
use parking_lot::Mutex;
use subattr_rs_core::{script_name::ScriptName, value::Value};
use subattr_rs_errors::{attr_error, Result};
use subattr_rs_function_support::script_fn::{CallContext, ScriptFn};
use tracing::{debug, trace};

use crate::attributes::attr_context::AttrContext;

/// Key type for the per-function caches: the argument tuple, or the
/// normalizer's output.
type MemoKey = Vec<Value>;

/// Either flavor of backing cache from the external `cached`
/// collaborator. Unbounded is the default; nothing is ever evicted
/// from it.
enum MemoCache {
    Unbound(UnboundCache<MemoKey, Value>),
    Bounded(SizedCache<MemoKey, Value>),
}

impl MemoCache {
    fn get(&mut self, key: &MemoKey) -> Option<Value> {
        match self {
            MemoCache::Unbound(cache) => cache.cache_get(key).cloned(),
            MemoCache::Bounded(cache) => cache.cache_get(key).cloned(),
        }
    }

    fn set(&mut self, key: MemoKey, value: Value) {
        match self {
            MemoCache::Unbound(cache) => {
                cache.cache_set(key, value);
            }
            MemoCache::Bounded(cache) => {
                cache.cache_set(key, value);
            }
        }
    }
}

/// `Memoize`: replace the function with a cache-checking wrapper.
/// Referential transparency is assumed, not verified: memoizing a
/// function with side effects or non-deterministic output produces
/// stale results for every call after the first with a given key, and
/// no error is signaled for it.
pub fn apply(context: &mut AttrContext, name: &ScriptName, args: &[String]) -> Result<()> {
    let Some(original) = context.lookup_function(name) else {
        return Err(attr_error!("cannot memoize unknown function `{}`", name));
    };

    let normalizer = parse_options(context, name, args)?;

    if original.prototype.flags.memoized() {
        debug!("`{}` is already memoized; wrapping the wrapper", name);
    }

    let cache = match context.config().memoize_cache_capacity {
        Some(capacity) => MemoCache::Bounded(SizedCache::with_size(capacity)),
        None => MemoCache::Unbound(UnboundCache::new()),
    };
    let cache = Mutex::new(cache);

    let mut flags = original.prototype.flags;
    flags.set_memoized(true);

    let prototype = original.prototype.clone().with_flags(flags);
    let inner = original.body();

    let wrapped = ScriptFn::new(prototype, move |ctx: &CallContext, call_args: &[Value]| {
        let key = match &normalizer {
            Some(normalize) => vec![normalize.call(ctx, call_args)?],
            None => call_args.to_vec(),
        };

        // The cache lock is never held across the underlying call;
        // memoized functions are allowed to recurse into themselves.
        if let Some(hit) = cache.lock().get(&key) {
            trace!("cache hit for `{}`", ctx.invoked_as);
            return Ok(hit);
        }

        let value = inner(ctx, call_args)?;
        cache.lock().set(key, value.clone());

        Ok(value)
    });

    context.replace_function(wrapped);

    Ok(())
}

/// Parse the option list. The only recognized option is `normalizer`,
/// followed by the name of a key-normalizing function. The name is
/// expected fully-qualified, since application happens outside the
/// original definition's scope; unqualified names resolve in the
/// memoized function's own package.
fn parse_options(
    context: &AttrContext,
    name: &ScriptName,
    args: &[String],
) -> Result<Option<ScriptFn>> {
    let mut normalizer = None;
    let mut iter = args.iter();

    while let Some(option) = iter.next() {
        match option.as_str() {
            "normalizer" => {
                let Some(target) = iter.next() else {
                    return Err(attr_error!(
                        "`normalizer` option on `{}` is missing a function name",
                        name
                    ));
                };

                let target_name = context.resolve_name(target, name.package);
                let Some(function) = context.lookup_function(&target_name) else {
                    return Err(attr_error!(
                        "normalizer `{}` for `{}` does not exist",
                        target_name,
                        name
                    ));
                };

                normalizer = Some(function);
            }
            unknown => {
                return Err(attr_error!(
                    "unknown Memoize option `{}` on `{}`",
                    unknown,
                    name
                ));
            }
        }
    }

    Ok(normalizer)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use claims::*;

    use super::*;
    use crate::test_support::{annotate, counting_fn, define, registry_fixture};

    #[test]
    fn test_memoized_body_runs_once_per_key() {
        let registry = registry_fixture();
        let (f, counter) = counting_fn("expensive");
        define(&registry, f);

        annotate(&registry, "expensive", "Memoize").unwrap();

        let name = ScriptName::parse("expensive");
        let args = [Value::Int(7)];

        assert_eq!(registry.call(&name, &args).unwrap(), Value::Int(7));
        assert_eq!(registry.call(&name, &args).unwrap(), Value::Int(7));
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        // a different key computes again
        registry.call(&name, &[Value::Int(8)]).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_normalizer_controls_the_key() {
        let registry = registry_fixture();
        let (f, counter) = counting_fn("lookup");
        define(&registry, f);

        // collapses every argument list to a single key
        define(
            &registry,
            ScriptFn::new(
                crate::test_support::proto("normalize"),
                |_ctx, _args| Ok(Value::Int(0)),
            ),
        );

        annotate(&registry, "lookup", "Memoize(normalizer, main::normalize)").unwrap();

        let name = ScriptName::parse("lookup");
        registry.call(&name, &[Value::Int(1)]).unwrap();
        registry.call(&name, &[Value::Int(2)]).unwrap();

        // both calls hit the same cache entry
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_normalizer_errors_at_application_time() {
        let registry = registry_fixture();
        let (f, _counter) = counting_fn("lookup");
        define(&registry, f);

        let result = annotate(&registry, "lookup", "Memoize(normalizer, main::nope)");

        assert_err!(result.as_ref());
        assert_eq!(
            result.unwrap_err().to_string(),
            "normalizer `main::nope` for `main::lookup` does not exist"
        );
    }

    #[test]
    fn test_unknown_option_errors() {
        let registry = registry_fixture();
        let (f, _counter) = counting_fn("lookup");
        define(&registry, f);

        let result = annotate(&registry, "lookup", "Memoize(wibble)");

        assert_err!(result.as_ref());
        assert_eq!(
            result.unwrap_err().to_string(),
            "unknown Memoize option `wibble` on `main::lookup`"
        );
    }

    #[test]
    fn test_memoizing_an_unknown_function_errors() {
        let registry = registry_fixture();

        let result = annotate(&registry, "ghost", "Memoize");

        assert_err!(result);
    }

    #[test]
    fn test_bounded_cache_evicts() {
        use subattr_rs_utils::config::ConfigBuilder;

        use crate::registry::Registry;

        let config = ConfigBuilder::default()
            .memoize_cache_capacity(1_usize)
            .build()
            .unwrap();
        let registry = Registry::new(config);

        let (f, counter) = counting_fn("tiny");
        define(&registry, f);
        annotate(&registry, "tiny", "Memoize").unwrap();

        let name = ScriptName::parse("tiny");
        registry.call(&name, &[Value::Int(1)]).unwrap();
        registry.call(&name, &[Value::Int(2)]).unwrap();

        // 1 was evicted by 2, so it computes again
        registry.call(&name, &[Value::Int(1)]).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_flags_record_the_wrap() {
        let registry = registry_fixture();
        let (f, _counter) = counting_fn("expensive");
        define(&registry, f);

        annotate(&registry, "expensive", "Memoize").unwrap();

        let name = ScriptName::parse("expensive");
        let flags = registry
            .symbol_space()
            .read()
            .lookup_function(&name)
            .unwrap()
            .prototype
            .flags;

        assert!(flags.memoized());
    }

    #[test]
    fn test_wrapper_propagates_body_errors() {
        let registry = registry_fixture();
        let failures = Arc::new(AtomicUsize::new(0));
        let counter = failures.clone();

        define(
            &registry,
            ScriptFn::new(crate::test_support::proto("flaky"), move |_ctx, _args| {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(attr_error!("boom"))
            }),
        );
        annotate(&registry, "flaky", "Memoize").unwrap();

        let name = ScriptName::parse("flaky");
        assert_err!(registry.call(&name, &[]));
        assert_err!(registry.call(&name, &[]));

        // errors are not cached
        assert_eq!(failures.load(Ordering::SeqCst), 2);
    }
}
