mod binary;
mod workflow;
