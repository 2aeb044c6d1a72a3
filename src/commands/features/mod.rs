pub(super) mod digest;
pub(super) mod feed;
pub(super) mod info;
pub(super) mod provinces;
pub(super) mod regions;
pub(super) mod subscription;
