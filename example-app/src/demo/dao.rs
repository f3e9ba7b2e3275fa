use component_macros::Component;

/// 数据访问组件
#[derive(Debug, Default, Component)]
#[resource]
pub struct TestDao;

impl TestDao {
    pub fn find(&self, id: u32) -> String {
        format!("record-{id}")
    }
}
