//! Delete command handler.

use crate::api::{self, Mode};
use crate::args::DeleteArgs;
use crate::commands::Out;
use crate::tracker::Tracker;
use crate::{Config, Result};

/// Deletes one transaction by ID and reports how many remain.
pub async fn delete(config: Config, mode: Mode, args: DeleteArgs) -> Result<Out<String>> {
    let mut tracker = Tracker::new(api::store(&config, mode).await?);
    tracker.delete(args.id()).await?;
    let remaining = tracker.transactions().len();
    let message = format!(
        "Deleted transaction {}, {} transaction{} remaining",
        args.id(),
        remaining,
        if remaining == 1 { "" } else { "s" }
    );
    Ok(Out::new(message, args.id().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{error_type, ErrorType};
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_delete() {
        let env = TestEnv::new().await;
        let state = env.get_state();
        let id = state[0].id().to_string();

        let out = delete(env.config(), Mode::Test, DeleteArgs::new(&id))
            .await
            .unwrap();
        assert_eq!(out.structure(), Some(&id));
        assert!(out.message().contains(&format!("{} transactions remaining", state.len() - 1)));

        let after = env.get_state();
        assert_eq!(after.len(), state.len() - 1);
        assert!(after.iter().all(|t| t.id() != id));
    }

    #[tokio::test]
    async fn test_delete_unknown_id() {
        let env = TestEnv::new().await;
        let before = env.get_state();
        let e = delete(env.config(), Mode::Test, DeleteArgs::new("nope"))
            .await
            .unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Store));
        assert_eq!(env.get_state(), before);
    }
}
