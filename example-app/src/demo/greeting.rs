use component_macros::Component;

/// 问候接口，有两个实现
pub trait Greeter: Send + Sync {
    fn greet(&self, name: &str) -> String;
}

#[derive(Debug, Default, Component)]
#[component]
#[implements(dyn Greeter)]
pub struct EnglishGreeter;

impl Greeter for EnglishGreeter {
    fn greet(&self, name: &str) -> String {
        format!("Hello, {name}!")
    }
}

#[derive(Debug, Default, Component)]
#[component]
#[implements(dyn Greeter)]
pub struct ChineseGreeter;

impl Greeter for ChineseGreeter {
    fn greet(&self, name: &str) -> String {
        format!("你好, {name}!")
    }
}
