pub mod flair_assignment;
