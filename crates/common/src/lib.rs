//! Pieces shared by every crate in the workspace: logging setup and the
//! small wire types that are not tied to a single service.

pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health::ok();
        assert_eq!(h.status, "ok");
    }
}
