// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deep link dispatch: two route tables, direct and operation routes.
//!
//! This example shows how to combine:
//! - a small `{param}` template table implementing `RouteTable`,
//! - direct routes and operation routes (single target and back-stack),
//! - a presenter and a notification sink around `DeepLinkDelegate::dispatch`.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example deeplink_basics`

use understory_deeplink::attributes::AttributeSet;
use understory_deeplink::delegate::DeepLinkDelegate;
use understory_deeplink::error::InvocationError;
use understory_deeplink::query;
use understory_deeplink::route::{Operation, OperationFn, RouteDescriptor, RouteTable};
use understory_deeplink::types::{
    CallerContext, Notification, Presenter, Request, Target, TaskStack,
};

/// The screen that received the link.
#[derive(Debug)]
struct Activity {
    name: &'static str,
    signed_in: bool,
}

impl CallerContext for Activity {}

/// `/`-separated templates; `{name}` captures one non-empty segment.
struct TemplateTable {
    routes: Vec<RouteDescriptor<Activity>>,
}

impl TemplateTable {
    fn captures(template: &str, uri: &str) -> Option<AttributeSet> {
        let pattern: Vec<&str> = template.split('/').collect();
        let actual: Vec<&str> = query::strip(uri).split('/').collect();
        if pattern.len() != actual.len() {
            return None;
        }
        let mut out = AttributeSet::new();
        for (p, a) in pattern.iter().zip(&actual) {
            match p.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                Some(name) if !a.is_empty() => {
                    out.insert(name, query::decode(a));
                }
                Some(_) => return None,
                None if p == a => {}
                None => return None,
            }
        }
        Some(out)
    }
}

impl RouteTable<Activity> for TemplateTable {
    fn parse(&self, uri: &str) -> Option<&RouteDescriptor<Activity>> {
        self.routes
            .iter()
            .find(|r| Self::captures(r.template(), uri).is_some())
    }

    fn path_parameters(&self, route: &RouteDescriptor<Activity>, uri: &str) -> AttributeSet {
        Self::captures(route.template(), uri).unwrap_or_default()
    }
}

fn notifications(_: &Activity) -> Result<TaskStack, InvocationError> {
    Ok(TaskStack::new()
        .with(Target::new("HomeScreen"))
        .with(Target::new("SettingsScreen"))
        .with(Target::new("NotificationSettingsScreen")))
}

fn search(caller: &Activity, attrs: &AttributeSet) -> Result<Target, InvocationError> {
    if !caller.signed_in {
        return Err(InvocationError::AccessDenied);
    }
    let q = attrs
        .get("q")
        .ok_or_else(|| InvocationError::failed("missing `q`"))?;
    Ok(Target::new("SearchScreen").with_extra("query", q))
}

struct PrintPresenter;

impl Presenter<Activity> for PrintPresenter {
    fn start(&self, caller: &Activity, target: &Target) {
        println!("  [{}] start {} {:?}", caller.name, target.id, target.flags);
    }

    fn start_stack(&self, caller: &Activity, stack: &TaskStack) {
        let ids: Vec<&str> = stack.targets().iter().map(|t| t.id.as_ref()).collect();
        println!("  [{}] replay stack {ids:?}", caller.name);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = TemplateTable {
        routes: vec![
            RouteDescriptor::direct("app://profile/{id}", "ProfileScreen"),
            RouteDescriptor::operation(
                "app://settings/notifications",
                "AppLinks",
                Operation::new("notifications").with(OperationFn::Stack(notifications)),
            ),
            RouteDescriptor::operation(
                "app://search",
                "AppLinks",
                Operation::new("search").with(OperationFn::TargetWithAttributes(search)),
            ),
        ],
    };
    let web = TemplateTable {
        routes: vec![
            RouteDescriptor::direct("https://example.com/u/{id}", "ProfileScreen"),
            // Shadowed by the app table, which is registered first.
            RouteDescriptor::direct("app://profile/{id}", "LegacyProfileScreen"),
        ],
    };

    let sink = |n: &Notification<'_>| {
        println!(
            "  notify successful={} template={:?} error={:?}",
            n.successful, n.template, n.error_message
        );
    };
    let tables: Vec<Box<dyn RouteTable<Activity>>> = vec![Box::new(app), Box::new(web)];
    let delegate = DeepLinkDelegate::with_collaborators(tables, sink, PrintPresenter);

    let caller = Activity {
        name: "LinkActivity",
        signed_in: true,
    };
    let links = [
        "app://profile/42?tab=posts",
        "app://profile/7?id=8",
        "https://example.com/u/alice",
        "app://settings/notifications",
        "app://search?q=rust+crates",
        "app://search",
        "app://unknown",
    ];
    for uri in links {
        println!("{uri} (supported: {})", delegate.supports(uri));
        let outcome = delegate.dispatch(&caller, &Request::new(uri).with_action("VIEW"));
        if let Some(target) = outcome.target() {
            let mut extras: Vec<(&str, &str)> = target.extras.iter().collect();
            extras.sort_unstable();
            println!("  extras {extras:?}");
        }
        if !outcome.duplicates().is_empty() {
            log::info!("path/query conflicts: {:?}", outcome.duplicates());
        }
    }

    let guest = Activity {
        name: "GuestActivity",
        signed_in: false,
    };
    let outcome = delegate.build_outcome(&guest, &Request::new("app://search?q=x"));
    println!("guest search: {}", outcome.message());
}
