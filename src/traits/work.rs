use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

use crate::engine::NodeContext;
use crate::graph::Node;

/// Caller-supplied task logic, invoked once per admitted node.
///
/// Any returned error marks the node failed and skips everything that
/// depends on it. Async closures become `Work` through [`work_fn`].
///
/// # Examples
/// ```
/// use dagflow::engine::NodeContext;
/// use dagflow::graph::Node;
/// use dagflow::traits::Work;
///
/// struct Echo;
///
/// #[async_trait::async_trait]
/// impl Work for Echo {
///     async fn run(&self, _ctx: NodeContext, node: Node) -> anyhow::Result<()> {
///         println!("running {node}");
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Work: Send + Sync {
    async fn run(&self, ctx: NodeContext, node: Node) -> anyhow::Result<()>;
}

/// Adapter that turns an async closure into [`Work`].
///
/// Going through [`work_fn`] lets the compiler infer the closure's argument
/// types from the `(NodeContext, Node)` signature.
pub struct WorkFn<F>(F);

/// Wrap an async closure as [`Work`].
///
/// # Examples
/// ```
/// use dagflow::traits::work_fn;
///
/// let work = work_fn(|_ctx, node| async move {
///     anyhow::ensure!(node.as_str() != "broken", "node {node} is broken");
///     anyhow::Ok(())
/// });
/// # let _ = work;
/// ```
pub fn work_fn<F, Fut>(f: F) -> WorkFn<F>
where
    F: Fn(NodeContext, Node) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    WorkFn(f)
}

#[async_trait]
impl<F, Fut> Work for WorkFn<F>
where
    F: Fn(NodeContext, Node) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    async fn run(&self, ctx: NodeContext, node: Node) -> anyhow::Result<()> {
        (self.0)(ctx, node).await
    }
}

#[async_trait]
impl<W: Work + ?Sized> Work for Arc<W> {
    async fn run(&self, ctx: NodeContext, node: Node) -> anyhow::Result<()> {
        (**self).run(ctx, node).await
    }
}
