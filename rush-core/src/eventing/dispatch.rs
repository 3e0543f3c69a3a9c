//! 分发算法（两个总线变体共用）
//!
//! 沿 `TypeChain` 由具体到抽象逐层取监听器快照并依次调用：
//! - 普通事件：每层每个监听器都调用；
//! - 可停止事件：每次调用后检查停止标志，若已停止则跳过本层剩余监听器，
//!   继续下一层（下一层同样先调用再检查）；任一祖先视图上的停止标志都算数；
//! - 取消标志从不参与控制流；
//! - 能力层只在事件具备对应能力时调用。
//!
//! 调用监听器期间不持有任何借用或锁，监听器可重入 subscribe/unsubscribe/post。
//!
use crate::config::BusConfig;
use crate::event::Event;
use crate::hierarchy::{Erased, TypeChain};
use crate::registry::Snapshot;
use std::any::{TypeId, type_name};

/// 分发一次事件，返回实际调用的监听器数量
pub(crate) fn run<E, F>(chain: &TypeChain, event: &mut E, mut listeners_for: F) -> usize
where
    E: Event,
    F: FnMut(TypeId) -> Option<Snapshot>,
{
    let event: &mut Erased = event;
    let mut invoked = 0;

    for level in chain.levels() {
        let Some(list) = listeners_for(level.type_id()) else {
            continue;
        };

        for listener in list.iter() {
            let Some(view) = chain.view(level, &mut *event) else {
                break;
            };
            listener.invoke(view);
            invoked += 1;

            if chain.is_stopped(&mut *event) {
                break;
            }
        }
    }

    invoked
}

pub(crate) fn log_post<E: Event>(config: &BusConfig, chain: &TypeChain, invoked: usize) {
    tracing::trace!(
        bus = %config.name,
        event = type_name::<E>(),
        levels = chain.len(),
        invoked,
        "event posted"
    );
    if invoked == 0 && config.log_dead_events {
        tracing::debug!(bus = %config.name, event = type_name::<E>(), "dead event: no listener invoked");
    }
}
