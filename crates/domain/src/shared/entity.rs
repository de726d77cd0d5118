pub trait Entity {
    fn id(&self) -> &str;
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
