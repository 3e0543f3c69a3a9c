//! 事件类型层级
//!
//! Rust 没有继承，事件通过组合声明祖先：子事件持有父事件字段，并在
//! `Event::hierarchy` 中以 `Hierarchy::extends` 给出“从子到父”的投影。
//! 每个具体类型只构建一次 `TypeChain`（由各总线缓存），分发时按固定顺序遍历。
//!
//! 声明的祖先之后是三个能力层（`dyn StoppableEvent`、`dyn CancellableEvent`、
//! `dyn Event`），以能力 trait 对象为目标的监听器在这些层被调用。
//!
use crate::event::{CancellableEvent, Event, StoppableEvent};
use std::any::{Any, TypeId, type_name};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 类型擦除后的事件
pub(crate) type Erased = dyn Any + 'static;

type Projection = Arc<dyn for<'a> Fn(&'a mut Erased) -> Option<&'a mut Erased> + Send + Sync>;

type AsEvent = for<'a> fn(&'a mut Erased) -> Option<&'a mut dyn Event>;

fn projection<F>(f: F) -> Projection
where
    F: for<'a> Fn(&'a mut Erased) -> Option<&'a mut Erased> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn as_event<P: Event>(view: &mut Erased) -> Option<&mut dyn Event> {
    view.downcast_mut::<P>().map(|p| p as &mut dyn Event)
}

/// 能力层：按 trait 对象而非具体类型匹配的监听器目标
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Capability {
    Stoppable,
    Cancellable,
    Any,
}

impl Capability {
    const ALL: [Capability; 3] = [
        Capability::Stoppable,
        Capability::Cancellable,
        Capability::Any,
    ];

    pub(crate) fn type_id(self) -> TypeId {
        match self {
            Capability::Stoppable => TypeId::of::<dyn StoppableEvent>(),
            Capability::Cancellable => TypeId::of::<dyn CancellableEvent>(),
            Capability::Any => TypeId::of::<dyn Event>(),
        }
    }

    pub(crate) fn type_name(self) -> &'static str {
        match self {
            Capability::Stoppable => type_name::<dyn StoppableEvent>(),
            Capability::Cancellable => type_name::<dyn CancellableEvent>(),
            Capability::Any => type_name::<dyn Event>(),
        }
    }

    fn offered_by(self, event: &dyn Event) -> bool {
        match self {
            Capability::Stoppable => event.as_stoppable().is_some(),
            Capability::Cancellable => event.as_cancellable().is_some(),
            Capability::Any => true,
        }
    }
}

/// 某一层交给监听器的视图
pub(crate) enum View<'a> {
    Declared(&'a mut Erased),
    Any(&'a mut dyn Event),
    Stoppable(&'a mut dyn StoppableEvent),
    Cancellable(&'a mut dyn CancellableEvent),
}

#[derive(Clone)]
enum LevelKind {
    Declared { project: Projection, as_event: AsEvent },
    Capability(Capability),
}

/// 类型链中的一层：类型标识 + 从具体事件到该层视图的投影
#[derive(Clone)]
pub struct Level {
    type_id: TypeId,
    type_name: &'static str,
    kind: LevelKind,
}

impl Level {
    fn declared<P: Event>(project: Projection) -> Self {
        Self {
            type_id: TypeId::of::<P>(),
            type_name: type_name::<P>(),
            kind: LevelKind::Declared {
                project,
                as_event: as_event::<P>,
            },
        }
    }

    fn capability(capability: Capability) -> Self {
        Self {
            type_id: capability.type_id(),
            type_name: capability.type_name(),
            kind: LevelKind::Capability(capability),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 是否为能力层（而非声明的事件类型）
    pub fn is_capability(&self) -> bool {
        matches!(self.kind, LevelKind::Capability(_))
    }

    /// 将具体事件投影为本层类型；类型不符或能力层时返回 None
    pub(crate) fn project<'a>(&self, event: &'a mut Erased) -> Option<&'a mut Erased> {
        match &self.kind {
            LevelKind::Declared { project, .. } => project(event),
            LevelKind::Capability(_) => None,
        }
    }

    fn as_event<'a>(&self, event: &'a mut Erased) -> Option<&'a mut dyn Event> {
        match &self.kind {
            LevelKind::Declared { project, as_event } => project(event).and_then(*as_event),
            LevelKind::Capability(_) => None,
        }
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Level")
            .field("type_name", &self.type_name)
            .finish()
    }
}

#[derive(Default)]
struct Graph {
    nodes: HashMap<TypeId, Level>,
    parents: HashMap<TypeId, Vec<TypeId>>,
}

impl Graph {
    // 逆后序：每个类型都排在其所有祖先之前，先声明的父类型靠前
    fn linearize(mut self, root: TypeId) -> Vec<Level> {
        let mut visited = HashSet::with_capacity(self.nodes.len());
        let mut order = Vec::with_capacity(self.nodes.len());
        self.visit(root, &mut visited, &mut order);
        order.reverse();
        order
            .into_iter()
            .filter_map(|id| self.nodes.remove(&id))
            .collect()
    }

    fn visit(&self, id: TypeId, visited: &mut HashSet<TypeId>, order: &mut Vec<TypeId>) {
        if !visited.insert(id) {
            return;
        }
        if let Some(parents) = self.parents.get(&id) {
            for parent in parents.iter().rev() {
                self.visit(*parent, visited, order);
            }
        }
        order.push(id);
    }
}

/// 祖先声明器，在 `Event::hierarchy` 中使用
///
/// ```
/// use rush_core::{Event, Hierarchy, TypeChain};
///
/// struct Base;
/// impl Event for Base {}
///
/// struct Derived {
///     base: Base,
/// }
/// impl Event for Derived {
///     fn hierarchy(h: &mut Hierarchy<'_, Self>) {
///         h.extends::<Base>(|e| &mut e.base);
///     }
/// }
///
/// let chain = TypeChain::of::<Derived>();
/// assert_eq!(chain.declared().len(), 2);
/// ```
pub struct Hierarchy<'a, C> {
    graph: &'a mut Graph,
    current: TypeId,
    project: Projection,
    _marker: PhantomData<fn(&mut C)>,
}

impl<C: Event> Hierarchy<'_, C> {
    /// 声明 `P` 为直接父类型，`via` 给出从当前类型到父类型的可变投影
    ///
    /// 同一祖先经由多条路径可达时，只保留第一次声明的投影。
    pub fn extends<P: Event>(&mut self, via: fn(&mut C) -> &mut P) -> &mut Self {
        let parent = TypeId::of::<P>();
        self.graph
            .parents
            .entry(self.current)
            .or_default()
            .push(parent);

        if self.graph.nodes.contains_key(&parent) {
            return self;
        }

        let base = self.project.clone();
        let project = projection(move |event| {
            let child = base(event)?.downcast_mut::<C>()?;
            Some(via(child) as &mut Erased)
        });

        self.graph
            .nodes
            .insert(parent, Level::declared::<P>(project.clone()));

        P::hierarchy(&mut Hierarchy {
            graph: &mut *self.graph,
            current: parent,
            project,
            _marker: PhantomData,
        });

        self
    }
}

/// 具体事件类型展开后的祖先链
///
/// 由具体到抽象：自身、声明的祖先，最后是能力层；不含通用根类型。
#[derive(Clone, Debug)]
pub struct TypeChain {
    levels: Vec<Level>,
    declared: usize,
}

impl TypeChain {
    pub fn of<E: Event>() -> Self {
        let root = TypeId::of::<E>();
        let project = projection(|event| Some(event));

        let mut graph = Graph::default();
        graph.nodes.insert(root, Level::declared::<E>(project.clone()));

        E::hierarchy(&mut Hierarchy {
            graph: &mut graph,
            current: root,
            project,
            _marker: PhantomData,
        });

        let mut levels = graph.linearize(root);
        let declared = levels.len();
        levels.extend(Capability::ALL.into_iter().map(Level::capability));

        Self { levels, declared }
    }

    /// 分发顺序下的全部层
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// 仅声明的事件类型（自身与祖先）
    pub fn declared(&self) -> &[Level] {
        &self.levels[..self.declared]
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// 各层类型名（调试与日志使用）
    pub fn type_names(&self) -> Vec<&'static str> {
        self.levels.iter().map(Level::type_name).collect()
    }

    /// 取某一层交给监听器的视图
    ///
    /// 能力层取第一个（最具体的）具备该能力的声明层视图。
    pub(crate) fn view<'a>(&self, level: &Level, event: &'a mut Erased) -> Option<View<'a>> {
        let capability = match &level.kind {
            LevelKind::Declared { project, .. } => return project(event).map(View::Declared),
            LevelKind::Capability(capability) => *capability,
        };

        let declared = self.declared();
        let at = declared.iter().position(|l| {
            l.as_event(&mut *event)
                .is_some_and(|view| capability.offered_by(view))
        })?;
        let view = declared[at].as_event(event)?;
        match capability {
            Capability::Any => Some(View::Any(view)),
            Capability::Stoppable => view.as_stoppable_mut().map(View::Stoppable),
            Capability::Cancellable => view.as_cancellable_mut().map(View::Cancellable),
        }
    }

    /// 任一声明层视图可停止且已停止
    ///
    /// 组合出来的父事件各自携带标志，停止其中任何一个都视为整个事件已停止。
    pub(crate) fn is_stopped(&self, event: &mut Erased) -> bool {
        self.declared().iter().any(|level| {
            level.as_event(&mut *event).is_some_and(|view| {
                view.as_stoppable()
                    .is_some_and(|stoppable| stoppable.is_stopped())
            })
        })
    }
}
