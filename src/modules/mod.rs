pub mod school_admins;
