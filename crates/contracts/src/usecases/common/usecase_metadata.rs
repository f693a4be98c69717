/// Identity of a use case, shared by the UI page and the backend route.
pub trait UseCaseMetadata {
    /// Short index, e.g. "u508"
    fn usecase_index() -> &'static str;

    /// Technical name, e.g. "bulk_product_create"
    fn usecase_name() -> &'static str;

    /// Title shown on the page header
    fn display_name() -> &'static str;

    fn description() -> &'static str {
        ""
    }

    /// "u508_bulk_product_create"
    fn full_name() -> String {
        format!("{}_{}", Self::usecase_index(), Self::usecase_name())
    }

    /// Route prefix on the backend, e.g. "/api/u508"
    fn api_prefix() -> String {
        format!("/api/{}", Self::usecase_index())
    }
}
