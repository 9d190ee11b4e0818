//! Re-index the content store whenever it changes

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebouncedEvent};
use std::path::Path;
use std::time::Duration;

use crate::cache::CachedIndex;
use crate::Blog;

/// Block forever, rebuilding the listing after each burst of changes
pub fn run(blog: &Blog) -> Result<()> {
    let mut index = blog.cached_index();
    report(&mut index);

    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
    debouncer
        .watcher()
        .watch(&blog.content_dir, RecursiveMode::Recursive)?;

    tracing::info!("Watching {:?}. Press Ctrl+C to stop.", blog.content_dir);

    let extensions = index.index().options().extensions.clone();

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant: Vec<&DebouncedEvent> = events
                    .iter()
                    .filter(|e| is_content_file(&e.path, &extensions))
                    .collect();
                if relevant.is_empty() {
                    continue;
                }
                for event in &relevant {
                    tracing::debug!("Changed: {:?}", event.path);
                }
                report(&mut index);
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(_) => break,
        }
    }

    Ok(())
}

fn report(index: &mut CachedIndex) {
    match index.list_all() {
        Ok(articles) => tracing::info!("Indexed {} articles", articles.len()),
        Err(e) => tracing::error!("Indexing failed: {}", e),
    }
}

fn is_content_file(path: &Path, extensions: &[String]) -> bool {
    let ignored = path
        .components()
        .any(|c| c.as_os_str().to_string_lossy().starts_with('.'));
    if ignored {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|x| x == e))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_content_file() {
        let exts = vec!["mdx".to_string(), "md".to_string()];
        assert!(is_content_file(Path::new("/site/content/posts/a.mdx"), &exts));
        assert!(is_content_file(Path::new("posts/guides/b.md"), &exts));
        assert!(!is_content_file(Path::new("posts/notes.txt"), &exts));
        assert!(!is_content_file(Path::new("posts/.a.mdx.swp"), &exts));
        assert!(!is_content_file(Path::new("posts/.git/HEAD"), &exts));
    }
}
