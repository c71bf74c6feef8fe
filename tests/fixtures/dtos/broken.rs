pub struct BrokenDTO {
    pub name: String,
