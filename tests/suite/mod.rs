mod navigation;
mod persistence;
mod recovery;
mod resize;
