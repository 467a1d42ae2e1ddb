pub mod sidebar;
pub mod sub_tabs;
