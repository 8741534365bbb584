//! Bottom-up resolution of the target graph.
//!
//! The bundle state itself never walks the graph; this driver does.
//! Dependencies resolve strictly before their dependents, so by the time a
//! target is finalized every `bundle_data` contribution below it has been
//! classified. `Group` targets are flattened here: their accumulated
//! bundle deps are re-presented to the dependent one edge at a time.

use std::sync::Arc;

use carton_foundation::{Label, SourceFile, SubstitutionPattern};
use carton_trace::{ScopedTrace, TraceKind};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::bundle_data::BundleData;
use crate::error::BundleError;
use crate::target::{Target, TargetKind};

/// An unresolved target description, as loaded from a manifest. The
/// `bundle` field carries the configured (but not yet resolved) bundle
/// state; plain targets leave it empty.
#[derive(Debug)]
pub struct TargetSpec {
    pub label: Label,
    pub kind: TargetKind,
    pub sources: Vec<SourceFile>,
    pub destination: Option<SubstitutionPattern>,
    pub deps: Vec<Label>,
    pub bundle: BundleData,
}

impl TargetSpec {
    pub fn new(label: Label, kind: TargetKind) -> Self {
        TargetSpec {
            label,
            kind,
            sources: Vec::new(),
            destination: None,
            deps: Vec::new(),
            bundle: BundleData::new(),
        }
    }
}

/// Resolves a whole graph, returning the targets in resolution order
/// (dependencies first). The first configuration error aborts resolution.
pub fn resolve_graph(specs: Vec<TargetSpec>) -> Result<Vec<Arc<Target>>, BundleError> {
    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    for (at, spec) in specs.iter().enumerate() {
        if index.insert(spec.label.to_string(), at).is_some() {
            return Err(BundleError::DuplicateTarget {
                target: spec.label.clone(),
            });
        }
    }
    let labels: Vec<Label> = specs.iter().map(|spec| spec.label.clone()).collect();
    let count = specs.len();
    let mut resolver = Resolver {
        index,
        labels,
        states: vec![VisitState::Unvisited; count],
        specs: specs.into_iter().map(Some).collect(),
        resolved: vec![None; count],
        order: Vec::new(),
    };
    for at in 0..count {
        resolver.visit(at)?;
    }
    Ok(resolver.order)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    Visiting,
    Done,
}

struct Resolver {
    index: FxHashMap<String, usize>,
    labels: Vec<Label>,
    states: Vec<VisitState>,
    specs: Vec<Option<TargetSpec>>,
    resolved: Vec<Option<Arc<Target>>>,
    order: Vec<Arc<Target>>,
}

impl Resolver {
    fn visit(&mut self, at: usize) -> Result<Arc<Target>, BundleError> {
        match self.states[at] {
            VisitState::Done => {
                return Ok(self.resolved[at]
                    .clone()
                    .expect("finished targets are recorded"));
            }
            VisitState::Visiting => {
                return Err(BundleError::DependencyCycle {
                    target: self.labels[at].clone(),
                });
            }
            VisitState::Unvisited => {}
        }
        self.states[at] = VisitState::Visiting;
        let spec = self.specs[at].take().expect("each spec resolves once");

        let mut dep_targets = Vec::with_capacity(spec.deps.len());
        for dep_label in &spec.deps {
            let dep_at = match self.index.get(&dep_label.to_string()) {
                Some(&dep_at) => dep_at,
                None => {
                    return Err(BundleError::UnknownDependency {
                        target: spec.label.clone(),
                        dependency: dep_label.clone(),
                    });
                }
            };
            dep_targets.push(self.visit(dep_at)?);
        }

        let TargetSpec {
            label,
            kind,
            sources,
            destination,
            deps: _,
            mut bundle,
        } = spec;

        let mut trace = ScopedTrace::new(TraceKind::OnResolved, &label.to_string());
        for dep in &dep_targets {
            match dep.kind() {
                TargetKind::BundleData | TargetKind::CreateBundle => bundle.add_bundle_dep(dep),
                TargetKind::Group => {
                    for sub in dep.bundle().bundle_deps() {
                        bundle.add_bundle_dep(sub);
                    }
                }
            }
        }
        bundle.on_resolved(&label, kind)?;
        trace.done();
        debug!(%label, deps = dep_targets.len(), "target resolved");

        let target = Arc::new(Target::new(label, kind, sources, destination, dep_targets, bundle));
        self.states[at] = VisitState::Done;
        self.resolved[at] = Some(Arc::clone(&target));
        self.order.push(Arc::clone(&target));
        Ok(target)
    }
}
