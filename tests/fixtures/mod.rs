pub mod ward_bins;
